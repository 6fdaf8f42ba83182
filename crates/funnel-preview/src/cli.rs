use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "funnel-preview")]
#[command(author, version, about)]
#[command(long_about = "Preview and edit funnel slide presentations.\n\n\
    Loads a presentation from the admin API and plays it click-through,\n\
    synced to its audio track, or as a presenter teleprompter.\n\n\
    Examples:\n  \
    funnel-preview 42                  Preview presentation 42 (fullscreen)\n  \
    funnel-preview 42 --windowed       Preview in a window\n  \
    funnel-preview 42 --presenter      Start in presenter (teleprompter) view\n  \
    funnel-preview outline 42          Print the timeline\n  \
    funnel-preview config init         Set server and session cookie")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Presentation id to preview
    pub presentation: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Admin server base URL (overrides config)
    #[arg(long, global = false)]
    pub server: Option<String>,

    /// Start in presenter view when script notes exist
    #[arg(long, global = false)]
    pub presenter: bool,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a presentation's modules and slides
    Outline {
        /// Presentation id
        presentation: String,

        /// Admin server base URL (overrides config)
        #[arg(long)]
        server: Option<String>,
    },

    /// Export slides as PNG images
    Export {
        /// Presentation id
        presentation: String,

        /// Output directory for PNG files
        #[arg(short, long, default_value = "export")]
        output_dir: PathBuf,

        /// Export width in pixels
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Export height in pixels
        #[arg(long, default_value = "1080")]
        height: u32,

        /// Theme to render with instead of the presentation's own
        #[arg(long)]
        theme: Option<String>,

        /// Admin server base URL (overrides config)
        #[arg(long)]
        server: Option<String>,
    },

    /// List available themes and font families
    Themes,

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. server.base_url, defaults.theme)
        key: String,

        /// Value to set
        value: String,
    },

    /// Interactively create or update the configuration
    Init,
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Outline {
                presentation,
                server,
            }) => crate::commands::outline::run(&presentation, server.as_deref()),
            Some(Commands::Export {
                presentation,
                output_dir,
                width,
                height,
                theme,
                server,
            }) => crate::commands::export::run(crate::commands::export::ExportOptions {
                presentation,
                output_dir,
                width,
                height,
                theme,
                server,
            }),
            Some(Commands::Themes) => {
                crate::commands::themes::run();
                Ok(())
            }
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("funnel-preview {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(presentation) = self.presentation {
                    crate::app::run(crate::app::LaunchOptions {
                        presentation,
                        server: self.server,
                        presenter: self.presenter,
                        windowed: self.windowed,
                    })
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}
