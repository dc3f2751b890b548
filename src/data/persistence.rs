use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Data directory chosen on the command line; fixed for the process.
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// First caller wins; later calls are ignored.
pub fn set_data_dir(path: PathBuf) {
    let _ = DATA_DIR.set(path);
}

/// The configured data directory, or `./config` when none was set.
pub fn get_data_dir() -> Result<PathBuf> {
    match DATA_DIR.get() {
        Some(dir) => Ok(dir.clone()),
        None => Ok(std::env::current_dir()
            .context("failed to get current directory")?
            .join("config")),
    }
}

/// A YAML document with a fixed file name inside a directory.
pub trait YamlDocument: Sized + Default + Serialize + for<'de> Deserialize<'de> {
    fn filename() -> &'static str;

    fn path_in(dir: &Path) -> PathBuf {
        dir.join(Self::filename())
    }

    /// A missing file reads as `Default`.
    fn load_from(dir: &Path) -> Result<Self> {
        let path = Self::path_in(dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_norway::from_str(&text)
            .with_context(|| format!("failed to parse YAML from {}", path.display()))
    }

    /// Creates `dir` when needed.
    fn save_to(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create dir {}", dir.display()))?;
        let text = serde_norway::to_string(self).context("failed to serialize YAML")?;
        let path = Self::path_in(dir);
        fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))
    }
}
