mod api;
mod app;
mod cli;
mod commands;
mod config;
mod editor;
mod error;
mod fonts;
mod logging;
mod model;
mod playback;
mod render;
mod session;
mod slide_view;
mod sync;
mod theme;
mod transform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    logging::init(cli.verbose, cli.quiet, !cli.no_color);

    cli.run()
}
