use std::fmt;

use crate::locus::Locus;

/// Severity of a diagnostic. Lexical/syntactic errors that abort a stage
/// are always `Error`; semantic diagnostics may in principle be
/// downgraded to `Warning` by a caller, though the analyzer itself only
/// ever produces `Error`-severity entries today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single positioned diagnostic: file, locus, severity, and message.
///
/// This is the common shape shared by the lexer's fatal error, the
/// parser's fatal error, and each entry in the semantic analyzer's
/// non-aborting diagnostic list -- the stage-specific error enums
/// (`LexError`, `ParseError`, `SemaDiagnostic`) all convert into this via
/// `Diagnostic::new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub locus: Locus,
    pub message: String,
}

impl Diagnostic {
    pub fn error(locus: Locus, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            locus,
            message: message.into(),
        }
    }

    pub fn warning(locus: Locus, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            locus,
            message: message.into(),
        }
    }

    /// Render in the format mandated by spec §6:
    ///
    /// ```text
    /// <filename>:<line>:<col>: error: <message>
    ///
    ///   <source line>
    ///   <spaces><caret>
    /// ```
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut out = format!(
            "{filename}:{line}:{col}: {severity}: {message}\n",
            filename = filename,
            line = self.locus.line,
            col = self.locus.column,
            severity = self.severity,
            message = self.message,
        );
        if let Some(source_line) = source.lines().nth((self.locus.line.saturating_sub(1)) as usize) {
            out.push('\n');
            out.push_str("  ");
            out.push_str(source_line);
            out.push('\n');
            out.push_str("  ");
            for _ in 1..self.locus.column {
                out.push(' ');
            }
            out.push('^');
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}: {}", self.locus.line, self.locus.column, self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_caret() {
        let d = Diagnostic::error(Locus::new(1, 3, 2), "unexpected token");
        let rendered = d.render("stdin", "abc");
        assert!(rendered.contains("stdin:1:3: error: unexpected token"));
        assert!(rendered.contains("abc"));
        assert!(rendered.contains("  ^"));
    }

    #[test]
    fn display_is_terse() {
        let d = Diagnostic::warning(Locus::new(2, 1, 5), "undefined identifier 'x'");
        assert_eq!(d.to_string(), "2:1: warning: undefined identifier 'x'");
    }
}
