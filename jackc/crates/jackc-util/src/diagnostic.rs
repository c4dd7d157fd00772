//! Error and warning reporting.
//!
//! Every diagnostic names the translation unit it came from, a 1-based line
//! number, and optionally the offending lexeme. Rendering follows the fixed
//! compiler format:
//!
//! ```text
//! Main.jack: Error, line 7, at or near 'let', Unreachable code.
//! Main.jack: Warning, line 3, call arguments do not match subroutine declaration.
//! ```
//!
//! Errors are fatal: the phase that produces one returns it as an `Err` and
//! compilation stops. Warnings flow through the [`Handler`], which prints
//! them as they are produced and keeps them for inspection in tests.

use std::fmt;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// Aborts the compilation once reported.
    Error,
    /// Reported and ignored; compilation continues.
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "Error"),
            Level::Warning => write!(f, "Warning"),
        }
    }
}

/// A positioned error or warning.
///
/// `file` is the source file stem (without the `.jack` extension); the
/// extension is appended when the diagnostic is rendered. `lexeme` is
/// present for diagnostics raised while a token is in hand and absent for
/// resolver diagnostics, where only the originating declaration's file and
/// line survive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub file: String,
    pub line: u32,
    pub lexeme: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        level: Level,
        file: impl Into<String>,
        line: u32,
        lexeme: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            file: file.into(),
            line,
            lexeme,
            message: message.into(),
        }
    }

    /// A fatal error at a token.
    pub fn error(
        file: impl Into<String>,
        line: u32,
        lexeme: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Level::Error, file, line, lexeme, message)
    }

    /// A warning at a token.
    pub fn warning(
        file: impl Into<String>,
        line: u32,
        lexeme: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Level::Warning, file, line, lexeme, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lexeme {
            Some(lexeme) => write!(
                f,
                "{}.jack: {}, line {}, at or near '{}', {}",
                self.file, self.level, self.line, lexeme, self.message
            ),
            None => write!(
                f,
                "{}.jack: {}, line {}, {}",
                self.file, self.level, self.line, self.message
            ),
        }
    }
}

impl std::error::Error for Diagnostic {}

/// Collects and reports non-fatal diagnostics.
///
/// Warnings are printed to stderr the moment they are emitted, preserving
/// their position relative to a later fatal error, and retained so tests
/// can assert on them without capturing the stream.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
    quiet: bool,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that records but never prints. Used by tests.
    pub fn quiet() -> Self {
        Self {
            diagnostics: Vec::new(),
            quiet: true,
        }
    }

    /// Emits a diagnostic: prints it (unless quiet) and records it.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if !self.quiet {
            eprintln!("{}", diagnostic);
        }
        self.diagnostics.push(diagnostic);
    }

    /// All diagnostics emitted so far, in order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of warnings emitted so far.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_with_lexeme_format() {
        let d = Diagnostic::error("Main", 7, Some("let".to_string()), "Unreachable code.");
        assert_eq!(
            d.to_string(),
            "Main.jack: Error, line 7, at or near 'let', Unreachable code."
        );
    }

    #[test]
    fn test_resolver_error_format() {
        let d = Diagnostic::error("Square", 12, None, "Unknown type 'Point'.");
        assert_eq!(
            d.to_string(),
            "Square.jack: Error, line 12, Unknown type 'Point'."
        );
    }

    #[test]
    fn test_warning_format() {
        let d = Diagnostic::warning(
            "Game",
            3,
            None,
            "call arguments do not match subroutine declaration.",
        );
        assert_eq!(
            d.to_string(),
            "Game.jack: Warning, line 3, call arguments do not match subroutine declaration."
        );
    }

    #[test]
    fn test_handler_records_in_order() {
        let mut handler = Handler::quiet();
        handler.emit(Diagnostic::warning("A", 1, None, "first"));
        handler.emit(Diagnostic::warning("A", 2, None, "second"));
        assert_eq!(handler.warning_count(), 2);
        assert_eq!(handler.diagnostics()[0].line, 1);
        assert_eq!(handler.diagnostics()[1].line, 2);
    }
}
