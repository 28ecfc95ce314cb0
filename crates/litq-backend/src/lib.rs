//! Backend compilation for litq queries.
//!
//! Takes the canonical expression produced by `litq-query` and rewrites it
//! into the field-tag dialect of a literature search backend:
//!
//! - **pubmed**: tag-native, field tags pass through
//! - **europepmc**: `"2015:2025"[pdat]` becomes `PUB_YEAR:(2015 TO 2025)`
//! - **cochrane**: field tags are removed
//!
//! Unknown backends are not an error; the canonical expression is passed
//! through with a warning. The [`SearchAdapter`] trait is the seam to the
//! HTTP clients that actually run the queries.

#![warn(missing_docs)]

mod backend;
mod compile;
mod search;
mod translate;

pub use backend::{Backend, Dialect, Target};
pub use compile::{CompileResult, CompileWarning, Diagnostic, Severity, compile};
pub use search::{ArticleRecord, SearchAdapter, SearchError, search_with};
pub use translate::{translate, translate_for};
