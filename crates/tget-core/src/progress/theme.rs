//! Terminal styling, constructed once and handed to whatever renders output.

use colored::{Color, ColoredString, Colorize};

/// One message role: a foreground color, optionally bold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    pub color: Option<Color>,
    pub bold: bool,
}

impl Paint {
    pub const fn new(color: Color, bold: bool) -> Self {
        Self {
            color: Some(color),
            bold,
        }
    }

    pub const fn plain() -> Self {
        Self {
            color: None,
            bold: false,
        }
    }

    pub fn paint(&self, text: &str) -> ColoredString {
        let mut s = match self.color {
            Some(color) => text.color(color),
            None => text.normal(),
        };
        if self.bold {
            s = s.bold();
        }
        s
    }
}

/// Immutable style configuration for messages, spinner and progress bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub title: Paint,
    pub subtitle: Paint,
    pub success: Paint,
    pub error: Paint,
    pub warning: Paint,
    pub info: Paint,
    pub prompt: Paint,
    pub highlight: Paint,
    /// indicatif template for the metadata spinner.
    pub spinner_template: &'static str,
    /// indicatif template for the transfer bar.
    pub bar_template: &'static str,
    /// Filled, head and empty characters of the transfer bar.
    pub bar_chars: &'static str,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Paint::new(Color::BrightCyan, true),
            subtitle: Paint::new(Color::Cyan, false),
            success: Paint::new(Color::BrightGreen, true),
            error: Paint::new(Color::BrightRed, true),
            warning: Paint::new(Color::BrightYellow, false),
            info: Paint::new(Color::BrightBlue, false),
            prompt: Paint::new(Color::BrightMagenta, false),
            highlight: Paint::new(Color::BrightWhite, true),
            spinner_template: "{spinner:.cyan} {msg} [{pos}]",
            bar_template: "{msg}\n[{bar:50.cyan/blue}] {bytes}/{total_bytes} ({percent}%)",
            bar_chars: "██░",
        }
    }
}

impl Theme {
    /// No colors; templates without style directives. Used for tests and dumb terminals.
    pub fn plain() -> Self {
        Self {
            title: Paint::plain(),
            subtitle: Paint::plain(),
            success: Paint::plain(),
            error: Paint::plain(),
            warning: Paint::plain(),
            info: Paint::plain(),
            prompt: Paint::plain(),
            highlight: Paint::plain(),
            spinner_template: "{spinner} {msg} [{pos}]",
            bar_template: "{msg}\n[{bar:50}] {bytes}/{total_bytes} ({percent}%)",
            bar_chars: "#>-",
        }
    }
}
