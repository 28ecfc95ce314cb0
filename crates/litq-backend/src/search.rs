//! The search adapter interface.
//!
//! Adapters own everything about talking to a backend: transport,
//! pagination, rate limits and response parsing. The compiler hands them a
//! finished backend query string and gets article records back.

use litq_query::{QueryError, QueryErrorKind, QueryParser};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{backend::Target, compile::compile};

/// One article returned by a backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Backend-specific identifier (PMID, Europe PMC id, ...).
    pub id: String,
    /// Article title.
    pub title: String,
    /// Publication year.
    pub year: Option<u16>,
    /// Author names, in publication order.
    pub authors: Vec<String>,
    /// Journal title.
    pub journal: Option<String>,
    /// Digital object identifier.
    pub doi: Option<String>,
    /// Link to the article or its abstract page.
    pub url: Option<String>,
    /// Abstract text.
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
}

/// Errors from searching a backend.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query failed validation; nothing was sent.
    #[error("query is invalid")]
    InvalidQuery(#[source] Box<QueryError>),
    /// A result limit of zero was requested.
    #[error("search limit must be at least 1")]
    ZeroLimit,
    /// The adapter failed.
    #[error("{backend} search failed: {message}")]
    Backend {
        /// The backend the adapter talks to.
        backend: String,
        /// What went wrong.
        message: String,
    },
}

/// A client for one search backend.
pub trait SearchAdapter {
    /// Runs a backend query and returns at most `limit` records.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<ArticleRecord>, SearchError>;
}

/// Compiles `raw` for `target` and runs it through `adapter`.
///
/// Fails before dispatch if the query does not validate.
pub fn search_with(
    adapter: &dyn SearchAdapter,
    raw: &str,
    target: &Target,
    parser: &QueryParser,
    limit: usize,
) -> Result<Vec<ArticleRecord>, SearchError> {
    if limit == 0 {
        return Err(SearchError::ZeroLimit);
    }
    let result = compile(raw, target, parser);
    if let Some(err) = result.error {
        return Err(SearchError::InvalidQuery(Box::new(err)));
    }
    let Some(query) = result.backend_query else {
        return Err(SearchError::InvalidQuery(Box::new(QueryError::new(
            QueryErrorKind::EmptyQuery,
        ))));
    };
    debug!(backend = %target, %query, limit, "dispatching search");
    let mut records = adapter.search(&query, limit)?;
    records.truncate(limit);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::backend::Backend;

    /// Records the queries it receives and returns canned records.
    struct Recorder {
        queries: RefCell<Vec<String>>,
        records: Vec<ArticleRecord>,
    }

    impl Recorder {
        fn new(count: usize) -> Self {
            let records = (0..count)
                .map(|i| ArticleRecord {
                    id: format!("PMID{i}"),
                    title: format!("Article {i}"),
                    year: Some(2020),
                    ..ArticleRecord::default()
                })
                .collect();
            Self {
                queries: RefCell::new(Vec::new()),
                records,
            }
        }
    }

    impl SearchAdapter for Recorder {
        fn search(&self, query: &str, _limit: usize) -> Result<Vec<ArticleRecord>, SearchError> {
            self.queries.borrow_mut().push(query.to_string());
            Ok(self.records.clone())
        }
    }

    /// Always fails.
    struct Offline;

    impl SearchAdapter for Offline {
        fn search(&self, _query: &str, _limit: usize) -> Result<Vec<ArticleRecord>, SearchError> {
            Err(SearchError::Backend {
                backend: "pubmed".into(),
                message: "connection refused".into(),
            })
        }
    }

    #[test]
    fn dispatches_backend_query() {
        let adapter = Recorder::new(5);
        let records = search_with(
            &adapter,
            "\"cancer\"[MeSH] AND \"2015:2025\"[pdat]",
            &Backend::EuropePmc.into(),
            &QueryParser::default(),
            3,
        )
        .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(
            adapter.queries.borrow().as_slice(),
            ["(\"cancer\"[MeSH] AND PUB_YEAR:(2015 TO 2025))"]
        );
    }

    #[test]
    fn invalid_query_is_not_dispatched() {
        let adapter = Recorder::new(1);
        let err = search_with(
            &adapter,
            "cancer AND tumor",
            &Backend::PubMed.into(),
            &QueryParser::default(),
            10,
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
        assert!(adapter.queries.borrow().is_empty());
    }

    #[test]
    fn zero_limit_rejected() {
        let err = search_with(
            &Recorder::new(1),
            "\"a\"",
            &Backend::PubMed.into(),
            &QueryParser::default(),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::ZeroLimit));
    }

    #[test]
    fn adapter_errors_propagate() {
        let err = search_with(
            &Offline,
            "\"a\"",
            &Backend::PubMed.into(),
            &QueryParser::default(),
            5,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "pubmed search failed: connection refused");
    }

    #[test]
    fn record_serializes_abstract_field() {
        let record = ArticleRecord {
            id: "1".into(),
            abstract_text: Some("text".into()),
            ..ArticleRecord::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["abstract"], "text");
    }
}
