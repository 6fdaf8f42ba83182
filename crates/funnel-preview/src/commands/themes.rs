use colored::Colorize;

use crate::fonts::FONT_FAMILIES;
use crate::theme::{self, DEFAULT_THEME, THEME_NAMES, Theme};

pub fn run() {
    println!("{}", "Themes".bold());
    for name in THEME_NAMES {
        let Some(theme) = Theme::from_name(name) else {
            continue;
        };
        let marker = if name == DEFAULT_THEME { " (default)" } else { "" };
        println!(
            "  {:<10} {:<12} bg {}  text {}  accent {}{}",
            name.cyan(),
            theme.label,
            theme::to_hex_color(theme.background),
            theme::to_hex_color(theme.foreground),
            theme::to_hex_color(theme.accent),
            marker.dimmed()
        );
    }
    println!();
    println!("{}", "Font families".bold());
    for family in FONT_FAMILIES {
        println!("  {family}");
    }
}
