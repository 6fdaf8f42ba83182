use anyhow::{Context, Result};
use colored::Colorize;
use inquire::{Confirm, Password, Select, Text};

use crate::cli::ConfigCommands;
use crate::config::{self, Config};
use crate::theme::THEME_NAMES;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
        ConfigCommands::Init => init(),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();
    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();

    let cookie = match config.session_cookie() {
        Some(_) if config.server.as_ref().is_some_and(|s| s.session_cookie.is_some()) => {
            "set".green()
        }
        Some(_) => format!("from {}", config::SESSION_COOKIE_ENV).green(),
        None => "not set".yellow(),
    };
    println!("  server.base_url        {}", config.base_url());
    println!("  server.session_cookie  {cookie}");
    println!("  server.timeout_secs    {}", config.timeout().as_secs());
    println!(
        "  defaults.theme         {}",
        config.default_theme().unwrap_or("(presentation's own)")
    );
    println!("  defaults.windowed      {}", config.windowed());
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!("{} {key} saved to {}", "✓".green(), path.display());
    Ok(())
}

fn init() -> Result<()> {
    let mut config = Config::load_or_default();

    let base_url = Text::new("Admin server URL:")
        .with_default(config.base_url())
        .prompt()
        .context("Prompt cancelled")?;
    config.set("server.base_url", base_url.trim())?;

    let update_cookie = Confirm::new("Set the session cookie now?")
        .with_default(config.session_cookie().is_none())
        .with_help_message("Copy the Cookie header from a logged-in admin browser session")
        .prompt()
        .context("Prompt cancelled")?;
    if update_cookie {
        let cookie = Password::new("Session cookie:")
            .without_confirmation()
            .prompt()
            .context("Prompt cancelled")?;
        config.set("server.session_cookie", cookie.trim())?;
    }

    let mut options = vec!["(presentation's own)"];
    options.extend(THEME_NAMES);
    let theme = Select::new("Default theme:", options)
        .prompt()
        .context("Prompt cancelled")?;
    if theme != "(presentation's own)" {
        config.set("defaults.theme", theme)?;
    } else if let Some(defaults) = config.defaults.as_mut() {
        defaults.theme = None;
    }

    let windowed = Confirm::new("Open in a window instead of fullscreen?")
        .with_default(config.windowed())
        .prompt()
        .context("Prompt cancelled")?;
    config.set("defaults.windowed", if windowed { "true" } else { "false" })?;

    let path = config.save()?;
    println!("{} Configuration saved to {}", "✓".green(), path.display());
    Ok(())
}
