//! Configuration-file discovery.
//!
//! Token and endpoint resolution order: `--token`/`--api` flags and
//! their environment variables (handled by clap), then the nearest
//! `.sitedeploy.json` walking up from the working directory, then
//! `config.json` in the user config directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = ".sitedeploy.json";

/// On-disk configuration file shape. All fields optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub api: Option<String>,
}

/// Loads the nearest configuration file, or defaults when none exists.
pub fn load() -> FileConfig {
    for path in search_paths() {
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        match serde_json::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config file");
                return config;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
            }
        }
    }
    FileConfig::default()
}

/// Candidate config paths: every ancestor of the working directory,
/// then the user config directory.
fn search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir: Option<&Path> = Some(&cwd);
        while let Some(d) = dir {
            paths.push(d.join(CONFIG_FILENAME));
            dir = d.parent();
        }
    }
    if let Some(dirs) = ProjectDirs::from("dev", "sitedeploy", "sitedeploy") {
        paths.push(dirs.config_dir().join("config.json"));
    }
    paths
}
