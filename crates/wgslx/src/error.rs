//! Error types for the minification pipeline.

use wgslx_ast::Diagnostics;

/// Errors that can occur while minifying a program.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source could not be parsed or resolved. Holds the joined text of
    /// every error diagnostic.
    #[error("{0}")]
    ParseOrResolve(String),

    /// A pass produced a program that no longer resolves.
    #[error("internal compiler error: output of {stage} does not resolve\n{diagnostics}")]
    InternalConsistency {
        stage: String,
        diagnostics: Diagnostics,
    },
}

impl From<Diagnostics> for Error {
    fn from(diagnostics: Diagnostics) -> Self {
        Error::ParseOrResolve(diagnostics.error_text())
    }
}
