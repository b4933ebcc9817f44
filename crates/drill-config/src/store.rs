//! Local store locations (note database, media directory, artifact namespace).

use std::path::{Path, PathBuf};

use drill_core::ids::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};

fn default_database() -> PathBuf {
    PathBuf::from(".drill/deck.db")
}

fn default_media_dir() -> PathBuf {
    PathBuf::from(".drill/media")
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// libSQL database file holding decks and cards.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Directory receiving diagram artifacts.
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,

    /// Prefix of every diagram artifact name.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl StoreConfig {
    /// Database path, resolved against `root` when relative.
    #[must_use]
    pub fn database_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.database)
    }

    /// Media directory, resolved against `root` when relative.
    #[must_use]
    pub fn media_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.media_dir)
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            media_dir: default_media_dir(),
            namespace: default_namespace(),
        }
    }
}
