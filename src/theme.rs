//! Theme configuration for CLI output
//!
//! Centralizes all color definitions for easy customization.
//! Colors are emitted as ANSI escape codes and suppressed when stdout is
//! not a terminal or `NO_COLOR` is set.

use crossterm::style::Color;

/// Theme configuration for CLI output.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary text color (used for most content)
    pub text_primary: Color,
    /// Secondary/dimmed text color
    pub text_secondary: Color,
    /// Accent color for highlights and important elements
    pub accent: Color,
    /// Error/warning color
    pub error: Color,
    /// Success color
    pub success: Color,
    /// Whether escape codes are emitted at all
    pub enabled: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::standard()
    }
}

impl Theme {
    /// Light gray text with green accent.
    pub fn standard() -> Self {
        Self {
            text_primary: Color::Grey,
            text_secondary: Color::DarkGrey,
            accent: Color::Green,
            error: Color::Red,
            success: Color::Green,
            enabled: true,
        }
    }

    /// Same palette with colors switched off.
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::standard()
        }
    }

    fn paint(&self, color: Color, text: &str) -> String {
        if self.enabled {
            format!("{}{}{}", color_to_ansi(color), text, ANSI_RESET)
        } else {
            text.to_string()
        }
    }

    /// Format text with the accent color.
    pub fn accent_text(&self, text: &str) -> String {
        self.paint(self.accent, text)
    }

    /// Format text with the primary color.
    pub fn primary_text(&self, text: &str) -> String {
        self.paint(self.text_primary, text)
    }

    /// Format text with the secondary color.
    pub fn secondary_text(&self, text: &str) -> String {
        self.paint(self.text_secondary, text)
    }

    /// Format text with the error color.
    pub fn error_text(&self, text: &str) -> String {
        self.paint(self.error, text)
    }

    /// Format text with the success color.
    pub fn success_text(&self, text: &str) -> String {
        self.paint(self.success, text)
    }
}

/// ANSI reset sequence
const ANSI_RESET: &str = "\x1b[0m";

/// Convert a crossterm Color to an ANSI escape code.
fn color_to_ansi(color: Color) -> &'static str {
    match color {
        Color::Black => "\x1b[30m",
        Color::DarkRed | Color::Red => "\x1b[31m",
        Color::DarkGreen | Color::Green => "\x1b[32m",
        Color::DarkYellow | Color::Yellow => "\x1b[33m",
        Color::DarkBlue | Color::Blue => "\x1b[34m",
        Color::DarkMagenta | Color::Magenta => "\x1b[35m",
        Color::DarkCyan | Color::Cyan => "\x1b[36m",
        Color::Grey => "\x1b[37m",
        Color::DarkGrey => "\x1b[90m",
        Color::White => "\x1b[97m",
        Color::Reset => "\x1b[0m",
        // For RGB and indexed colors, fall back to reset (no color)
        _ => "",
    }
}

/// Theme for the current process.
///
/// Colors are disabled when `NO_COLOR` is set or stdout is not a TTY.
pub fn current_theme() -> Theme {
    if std::env::var_os("NO_COLOR").is_some() || !atty::is(atty::Stream::Stdout) {
        Theme::plain()
    } else {
        Theme::standard()
    }
}
