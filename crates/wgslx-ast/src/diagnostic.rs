//! Front-end diagnostics.

use std::fmt;

/// Location of a token in the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    /// Byte offset from the start of the source.
    pub offset: u32,
    pub len: u32,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub col: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
            span,
        }
    }

    pub fn warning(message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            Level::Error => "error",
            Level::Warning => "warning",
        };
        match self.span {
            Some(span) => write!(f, "{}:{} {level}: {}", span.line, span.col, self.message),
            None => write!(f, "{level}: {}", self.message),
        }
    }
}

/// An ordered list of diagnostics.
///
/// As an error value, it displays the joined text of its error-level entries.
#[derive(Clone, Debug, Default, PartialEq, thiserror::Error)]
#[error("{}", join_errors(.list))]
pub struct Diagnostics {
    list: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.list.push(diagnostic);
    }

    pub fn error(&mut self, message: impl Into<String>, span: Option<Span>) {
        self.push(Diagnostic::error(message, span));
    }

    pub fn warning(&mut self, message: impl Into<String>, span: Option<Span>) {
        self.push(Diagnostic::warning(message, span));
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.list.extend(other.list);
    }

    pub fn has_errors(&self) -> bool {
        self.list.iter().any(|d| d.level == Level::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.list.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.list.iter().filter(|d| d.level == Level::Warning)
    }

    /// Newline-joined text of every error-level diagnostic.
    pub fn error_text(&self) -> String {
        join_errors(&self.list)
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            list: vec![diagnostic],
        }
    }
}

fn join_errors(list: &[Diagnostic]) -> String {
    list.iter()
        .filter(|d| d.level == Level::Error)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_text_skips_warnings() {
        let mut diags = Diagnostics::new();
        diags.warning("unused variable 'x'", None);
        diags.error(
            "expected ';'",
            Some(Span {
                offset: 10,
                len: 1,
                line: 2,
                col: 5,
            }),
        );
        diags.error("unresolved identifier 'y'", None);
        assert!(diags.has_errors());
        assert_eq!(
            diags.to_string(),
            "2:5 error: expected ';'\nerror: unresolved identifier 'y'"
        );
        assert_eq!(diags.warnings().count(), 1);
    }

    #[test]
    fn empty_has_no_errors() {
        let diags = Diagnostics::new();
        assert!(!diags.has_errors());
        assert!(diags.is_empty());
        assert_eq!(diags.error_text(), "");
    }
}
