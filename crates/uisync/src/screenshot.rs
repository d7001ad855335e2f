// Screenshot artifacts
//
// Screenshots are a side product of a run: PNG files named after the step or
// check that produced them, written under one directory.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Writes PNG screenshots into a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    /// Creates a store writing to `dir` (created on first save)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a screenshot called `name` is written to: `<dir>/<slug>.png`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let name = name.strip_suffix(".png").unwrap_or(name);
        self.dir.join(format!("{}.png", slug(name)))
    }

    /// Writes `png` as `<dir>/<slug(name)>.png` and returns the path.
    pub async fn save(&self, name: &str, png: &[u8]) -> Result<PathBuf> {
        if png.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "screenshot '{}' is empty",
                name
            )));
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::from(e).context(format!("creating {}", self.dir.display())))?;

        let path = self.path_for(name);
        tokio::fs::write(&path, png)
            .await
            .map_err(|e| Error::from(e).context(format!("writing {}", path.display())))?;

        tracing::info!("Saved screenshot {}", path.display());
        Ok(path)
    }
}

/// File-name-safe form of a step or screenshot name.
///
/// Keeps ASCII alphanumerics, `_` and `-`; every other run of characters
/// becomes a single `-`.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "screenshot".to_string()
    } else {
        trimmed.to_string()
    }
}
