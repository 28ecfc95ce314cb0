//! Configuration file discovery.
//!
//! Two scopes feed the merged configuration. Project files named
//! `.litq.toml` are collected from the working directory upward. One user
//! file applies everywhere: `config.toml` in the platform config directory
//! (`$XDG_CONFIG_HOME/litq/` on Linux), or `~/.litq.toml` when that file does
//! not exist.

use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use tracing::debug;

use crate::parse::is_root_config;

/// The project configuration filename.
pub const CONFIG_FILENAME: &str = ".litq.toml";

/// The user configuration filename inside the platform config directory.
pub const USER_CONFIG_FILENAME: &str = "config.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: project files closest to `cwd` first,
/// then the user file. A project file with `root = true` ends the walk and
/// the user file is then skipped.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let (mut files, rooted) = project_config_files(cwd);
    if !rooted
        && let Some(user) = user_config_file()
        && !files.contains(&user)
    {
        files.push(user);
    }
    debug!(count = files.len(), rooted, "discovered config files");
    files
}

/// Collects project files from `cwd` upward, stopping after a root file.
///
/// The flag reports whether a root file was found.
fn project_config_files(cwd: &Path) -> (Vec<PathBuf>, bool) {
    let mut files = Vec::new();
    for dir in cwd.ancestors() {
        let path = dir.join(CONFIG_FILENAME);
        if !path.is_file() {
            continue;
        }
        let rooted = is_root_config(&path);
        files.push(path);
        if rooted {
            return (files, true);
        }
    }
    (files, false)
}

/// User config locations, preferred first.
fn user_config_candidates() -> Vec<PathBuf> {
    let preferred = ProjectDirs::from("", "", "litq")
        .map(|dirs| dirs.config_dir().join(USER_CONFIG_FILENAME));
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME));
    preferred.into_iter().chain(home).collect()
}

/// Returns where a new user configuration file is written.
///
/// Returns `None` if the home directory cannot be determined.
pub fn user_config_path() -> Option<PathBuf> {
    user_config_candidates().into_iter().next()
}

/// Returns the user configuration file in effect, if one exists.
pub fn user_config_file() -> Option<PathBuf> {
    user_config_candidates().into_iter().find(|path| path.is_file())
}

/// Checks if a path is one of the user configuration locations.
pub fn is_user_config(path: &Path) -> bool {
    user_config_candidates().iter().any(|candidate| candidate == path)
}
