//! # Output Configuration
//!
//! Controls whether CLI status lines are colored and decorated.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! Variables are read from the [`EnvMap`] snapshot the command was started
//! with, never from the live process environment.

use crate::environment::EnvMap;
use console::Style;
use std::fmt::Display;

/// Output configuration for controlling colors and markers.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
    /// Suppress everything except errors.
    pub quiet: bool,
}

impl OutputConfig {
    /// Builds the configuration from the `--color` flag and the environment.
    ///
    /// In auto mode, colors are disabled if `NO_COLOR` is set (even empty),
    /// `CLICOLOR=0`, `TERM=dumb`, or stdout is not a TTY (unless
    /// `CLICOLOR_FORCE=1`).
    pub fn from_env_and_flag(color_flag: &str, env: &EnvMap) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(env),
        };

        Self {
            use_color,
            quiet: false,
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn detect_color_support(env: &EnvMap) -> bool {
        if env.contains("NO_COLOR") {
            return false;
        }
        if env.get("CLICOLOR") == Some("0") {
            return false;
        }
        if env.get("CLICOLOR_FORCE").is_some_and(|v| v != "0") {
            return true;
        }
        if env.get("TERM") == Some("dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Prints a status line unless quiet.
    pub fn status(&self, marker: Marker, message: impl Display) {
        if self.quiet {
            return;
        }
        println!("{} {}", self.marker(marker), message);
    }

    /// Prints an indented detail line unless quiet.
    pub fn detail(&self, message: impl Display) {
        if !self.quiet {
            println!("   {}", message);
        }
    }

    /// Renders `marker` as an emoji when colored, as a bracketed tag otherwise.
    pub fn marker(&self, marker: Marker) -> String {
        let (emoji, plain, style) = match marker {
            Marker::Info => ("🔧", "[INFO]", Style::new().cyan()),
            Marker::Ok => ("✅", "[OK]", Style::new().green()),
            Marker::Skip => ("⏭️", "[SKIP]", Style::new().yellow()),
            Marker::Push => ("🚀", "[PUSH]", Style::new().magenta()),
        };
        if self.use_color {
            style.force_styling(true).apply_to(emoji).to_string()
        } else {
            plain.to_string()
        }
    }

    /// `text` in bold when colored.
    pub fn emphasis(&self, text: impl Display) -> String {
        if self.use_color {
            Style::new()
                .bold()
                .force_styling(true)
                .apply_to(text)
                .to_string()
        } else {
            text.to_string()
        }
    }
}

/// Kinds of status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Info,
    Ok,
    Skip,
    Push,
}
