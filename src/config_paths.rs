//! Where loupe keeps its files
//!
//! ```text
//! <root>/config.yaml
//! <root>/palettes/{dark,light}.yaml
//! <root>/logs/loupe.log.YYYY-MM-DD
//! ```
//!
//! `<root>` is `$XDG_CONFIG_HOME/loupe` or `~/.config/loupe` on Unix and
//! `%APPDATA%\loupe` on Windows. Tests point a [`ConfigPaths`] at a temp dir.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::palette::ThemeKind;

const APP_DIR: &str = "loupe";

/// Base name of the daily-rotated log file
pub const LOG_FILE_PREFIX: &str = "loupe.log";

/// File layout under one config root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    root: PathBuf,
}

impl ConfigPaths {
    /// Locate the per-user config root. `None` when there is no home directory.
    pub fn discover() -> Option<Self> {
        #[cfg(target_os = "windows")]
        let base = env::var_os("APPDATA").map(PathBuf::from);

        #[cfg(not(target_os = "windows"))]
        let base = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")));

        base.map(|dir| Self::at(dir.join(APP_DIR)))
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.yaml")
    }

    pub fn palettes_dir(&self) -> PathBuf {
        self.root.join("palettes")
    }

    /// User override for one of the built-in palettes
    pub fn palette_file(&self, kind: ThemeKind) -> PathBuf {
        self.palettes_dir().join(format!("{}.yaml", kind.id()))
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Newest rotated log file, or the bare prefix when nothing was written
    /// yet. Date suffixes sort lexically.
    pub fn newest_log(&self) -> PathBuf {
        let logs_dir = self.logs_dir();
        fs::read_dir(&logs_dir)
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX))
            })
            .max()
            .unwrap_or_else(|| logs_dir.join(LOG_FILE_PREFIX))
    }

    pub fn ensure_palettes_dir(&self) -> Result<PathBuf, String> {
        create(self.palettes_dir())
    }

    pub fn ensure_logs_dir(&self) -> Result<PathBuf, String> {
        create(self.logs_dir())
    }
}

fn create(dir: PathBuf) -> Result<PathBuf, String> {
    fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create directory {}: {}", dir.display(), e))?;
    Ok(dir)
}
