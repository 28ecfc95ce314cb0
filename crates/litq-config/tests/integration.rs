//! Integration tests for litq-config.
//!
//! Exercises the full loading pipeline: discovery, parse, merge, validate.

// Integration tests live outside cfg(test)
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use litq_config::{Config, ConfigWarning, discover_config_files, is_user_config};
use litq_query::MixingPolicy;

/// A temporary directory tree.
struct TestEnv {
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a file with content and returns its path.
    fn create_file(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn test_nested_configs_merge() {
    let env = TestEnv::new();
    env.create_file(
        ".litq.toml",
        r#"
root = true

[parser]
mixing = "strict"
max_tokens = 500

[operators]
and = ["plus"]

[compile]
backend = ["pubmed", "europepmc"]
"#,
    );
    env.create_file(
        "oncology/.litq.toml",
        r#"
[parser]
mixing = "permissive"

[operators]
not = ["sans"]
"#,
    );
    let cwd = env.path().join("oncology/search");
    fs::create_dir_all(&cwd).unwrap();

    let config = Config::load(&cwd).unwrap();
    assert_eq!(config.parser.mixing, MixingPolicy::Permissive);
    assert_eq!(config.parser.max_tokens, 500);
    assert_eq!(config.operators.and, ["plus"]);
    assert_eq!(config.operators.not, ["sans"]);
    assert_eq!(config.compile.backend, ["pubmed", "europepmc"]);
    assert!(config.validate().is_empty());

    let parsed = config
        .query_parser()
        .parse("\"tumor\" plus \"therapy\" sans \"mice\"")
        .unwrap();
    assert_eq!(parsed.canonical, "(\"tumor\" AND \"therapy\" NOT \"mice\")");
}

#[test]
fn test_invalid_file_is_an_error() {
    let env = TestEnv::new();
    env.create_file(".litq.toml", "root = true\n[compile]\nbackend = 3\n");

    let err = Config::load(env.path()).unwrap_err();
    assert!(err.to_string().contains(".litq.toml"));
}

#[test]
fn test_validation_through_load() {
    let env = TestEnv::new();
    env.create_file(
        ".litq.toml",
        "root = true\n[parser]\nmax_depth = 0\n[compile]\nbackend = []\n",
    );

    let warnings = Config::load(env.path()).unwrap().validate();
    assert_eq!(
        warnings,
        [
            ConfigWarning::ZeroLimit {
                setting: "max_depth"
            },
            ConfigWarning::NoDefaultBackend,
        ]
    );
}

#[test]
fn test_without_project_files_only_the_user_file_remains() {
    let env = TestEnv::new();
    let files = discover_config_files(env.path());
    assert!(files.len() <= 1);
    assert!(files.iter().all(|p| is_user_config(p)));
}
