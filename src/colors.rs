use std::io::{self, IsTerminal};

const RESET: &str = "\x1b[0m";

/// `--color` setting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Priority: explicit choice > NO_COLOR env > TTY detection
    pub fn should_use_colors(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Colors {
    pub error: &'static str,
    pub warning: &'static str,
    pub success: &'static str,
    /// Section headers and property keys
    pub key: &'static str,
    pub dim: &'static str,
    enabled: bool,
}

impl Colors {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            Self {
                error: "\x1b[31m",   // Red
                warning: "\x1b[33m", // Yellow
                success: "\x1b[32m", // Green
                key: "\x1b[36m",     // Cyan
                dim: "\x1b[2m",
                enabled: true,
            }
        } else {
            Self {
                error: "",
                warning: "",
                success: "",
                key: "",
                dim: "",
                enabled: false,
            }
        }
    }

    pub fn reset(&self) -> &'static str {
        if self.enabled {
            RESET
        } else {
            ""
        }
    }

    /// Wrap `text` in `color`, or return it unchanged when disabled.
    pub fn paint(&self, color: &str, text: &str) -> String {
        format!("{color}{text}{}", self.reset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_choices() {
        assert!(ColorChoice::Always.should_use_colors());
        assert!(!ColorChoice::Never.should_use_colors());
    }

    #[test]
    fn test_disabled_colors_paint_plain_text() {
        let colors = Colors::new(false);
        assert_eq!(colors.paint(colors.error, "bad"), "bad");
        assert_eq!(colors.reset(), "");
    }

    #[test]
    fn test_enabled_colors_wrap_text() {
        let colors = Colors::new(true);
        assert_eq!(colors.paint(colors.key, "k"), "\x1b[36mk\x1b[0m");
    }
}
