//! litq: a boolean literature-query compiler.
//!
//! Reviewers write one search strategy with quoted phrases, PubMed-style
//! field tags and AND/OR/NOT (in English or German). litq validates it,
//! rejects ambiguous operator mixing, produces a canonical fully
//! parenthesized form and translates that into the dialect of each
//! literature backend.

#![warn(missing_docs)]

pub mod cli;
