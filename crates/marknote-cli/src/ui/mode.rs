//! Output mode routing logic.

/// Output mode determines how results are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Machine-readable JSON output only
    Json,
    /// Plain text, stable for logs and scripts
    #[default]
    Plain,
    /// Human-friendly with colors and formatting (TTY only)
    Pretty,
}

impl OutputMode {
    /// Resolve output mode from flags and environment.
    ///
    /// `--json` wins over everything; `--format plain` and `TERM=dumb`
    /// force plain; otherwise pretty only on a TTY.
    pub fn resolve(
        json_flag: bool,
        format_flag: Option<&str>,
        is_tty: bool,
        term_is_dumb: bool,
    ) -> Self {
        if json_flag {
            return Self::Json;
        }
        if format_flag == Some("plain") || term_is_dumb {
            return Self::Plain;
        }
        if is_tty {
            Self::Pretty
        } else {
            Self::Plain
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_exclusive() {
        let mode = OutputMode::resolve(true, Some("plain"), true, false);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn test_plain_forces() {
        assert_eq!(
            OutputMode::resolve(false, Some("plain"), true, false),
            OutputMode::Plain
        );
        assert_eq!(
            OutputMode::resolve(false, None, true, true),
            OutputMode::Plain
        );
    }

    #[test]
    fn test_tty_decides_between_pretty_and_plain() {
        assert_eq!(
            OutputMode::resolve(false, Some("table"), true, false),
            OutputMode::Pretty
        );
        assert_eq!(
            OutputMode::resolve(false, None, false, false),
            OutputMode::Plain
        );
    }
}
