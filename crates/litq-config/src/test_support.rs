//! Test helpers shared across litq-config unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::discovery::CONFIG_FILENAME;

/// A temporary directory tree holding project config files.
pub struct TestTree {
    /// The temporary root, removed on drop.
    root: TempDir,
}

impl TestTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    /// Returns the root of the tree.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates the directory `rel` and returns its path.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.root.path().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes `.litq.toml` with `toml` in the directory `rel`.
    pub fn config(&self, rel: &str, toml: &str) -> PathBuf {
        let path = self.dir(rel).join(CONFIG_FILENAME);
        fs::write(&path, toml).unwrap();
        path
    }

    /// Writes a `.litq.toml` that sets `root = true`, followed by `toml`.
    pub fn root_config(&self, rel: &str, toml: &str) -> PathBuf {
        self.config(rel, &format!("root = true\n{toml}"))
    }
}
