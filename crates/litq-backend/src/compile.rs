//! The compile pipeline: raw query text in, backend query string out.

use litq_query::{QueryError, QueryFormat, QueryParser};
use serde::Serialize;
use tracing::info;

use crate::{backend::Target, translate::translate_for};

/// A non-fatal compilation problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileWarning {
    /// The target names no known backend; the canonical expression was used
    /// as the backend query.
    #[error("unknown backend '{name}'; the canonical expression is passed through unchanged")]
    UnknownBackend {
        /// The requested name.
        name: String,
    },
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Compilation failed.
    Error,
    /// Compilation succeeded with a caveat.
    Warning,
}

/// A structured diagnostic attached to a [`CompileResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// 1-based line in a multi-line query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Suggested fix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl From<&QueryError> for Diagnostic {
    fn from(err: &QueryError) -> Self {
        Self {
            severity: Severity::Error,
            message: err.message(),
            line: err.line,
            hint: err.suggestion().map(str::to_string),
        }
    }
}

impl From<&CompileWarning> for Diagnostic {
    fn from(warning: &CompileWarning) -> Self {
        Self {
            severity: Severity::Warning,
            message: warning.to_string(),
            line: None,
            hint: None,
        }
    }
}

/// The outcome of compiling one query for one target.
#[derive(Debug, Clone, Serialize)]
pub struct CompileResult {
    /// True if the query validated.
    pub success: bool,
    /// The target as requested.
    pub backend: String,
    /// The detected surface format.
    pub format: Option<QueryFormat>,
    /// The canonical, backend-neutral expression.
    pub canonical: Option<String>,
    /// The expression in the backend's dialect.
    pub backend_query: Option<String>,
    /// The error or warnings produced.
    pub diagnostics: Vec<Diagnostic>,
    /// The validation error, for rich rendering.
    #[serde(skip)]
    pub error: Option<QueryError>,
}

impl CompileResult {
    /// Returns the warnings among the diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}

/// Validates raw query text and translates it for `target`.
///
/// Validation failure is reported in the result, not returned as an error.
/// An unknown target degrades to pass-through with a warning.
pub fn compile(raw: &str, target: &Target, parser: &QueryParser) -> CompileResult {
    let parsed = match parser.parse(raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            return CompileResult {
                success: false,
                backend: target.to_string(),
                format: None,
                canonical: None,
                backend_query: None,
                diagnostics: vec![Diagnostic::from(&err)],
                error: Some(err),
            };
        }
    };

    let (backend_query, warning) = translate_for(&parsed.canonical, target);
    info!(backend = %target, query = %backend_query, "compiled query");

    CompileResult {
        success: true,
        backend: target.to_string(),
        format: Some(parsed.format),
        canonical: Some(parsed.canonical),
        backend_query: Some(backend_query),
        diagnostics: warning.iter().map(Diagnostic::from).collect(),
        error: None,
    }
}
