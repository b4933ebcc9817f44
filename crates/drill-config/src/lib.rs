//! # drill-config
//!
//! Layered configuration loading for Opening Drill using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DRILL_*` prefix, `__` as separator)
//! 2. Project-level `.drill/config.toml`
//! 3. User-level `~/.config/drill/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DRILL_DECK__NAME` -> `deck.name`, `DRILL_RENDER__PIECES` -> `render.pieces`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use drill_config::DrillConfig;
//!
//! let config = DrillConfig::load_with_dotenv().expect("config");
//!
//! if config.deck.is_configured() {
//!     println!("Syncing into deck: {}", config.deck.name);
//! }
//! ```

mod deck;
mod error;
mod render;
mod store;

pub use deck::DeckConfig;
pub use error::ConfigError;
pub use render::RenderConfig;
pub use store::StoreConfig;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use drill_core::enums::Side;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Project-local configuration directory.
pub const PROJECT_DIR: &str = ".drill";

/// Study files previously imported into one deck.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImportConfig {
    pub side: Side,
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DrillConfig {
    #[serde(default)]
    pub deck: DeckConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub render: RenderConfig,
    /// Imports by deck name.
    #[serde(default)]
    pub imports: BTreeMap<String, ImportConfig>,
}

impl DrillConfig {
    /// Load configuration for the current directory.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load configuration for the project rooted at `root`.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_from(root: &Path) -> Result<Self, ConfigError> {
        Self::figment_for(root)
            .extract()
            .map_err(ConfigError::from)
    }

    /// Build the figment provider chain for the current directory.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    /// Build the figment provider chain for the project rooted at `root`.
    #[must_use]
    pub fn figment_for(root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = root.join(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("DRILL_").split("__"))
    }

    /// Check values figment cannot type-check.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for malformed piece letters or an
    /// empty namespace or note type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let letters: Vec<char> = self.render.pieces.chars().collect();
        if letters.len() != 5 || letters.iter().any(|c| c.is_whitespace()) {
            return Err(ConfigError::InvalidValue {
                field: "render.pieces".into(),
                reason: format!(
                    "expected 5 letters for K, Q, R, B, N; got '{}'",
                    self.render.pieces
                ),
            });
        }
        if self.store.namespace.is_empty()
            || !self
                .store
                .namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::InvalidValue {
                field: "store.namespace".into(),
                reason: "must be non-empty and contain only [A-Za-z0-9_-]".into(),
            });
        }
        if self.deck.notetype.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "deck.notetype".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// The deck name, or `NotConfigured` if none was chosen.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when `deck.name` is empty.
    pub fn require_deck(&self) -> Result<&str, ConfigError> {
        if self.deck.is_configured() {
            Ok(&self.deck.name)
        } else {
            Err(ConfigError::NotConfigured {
                section: "deck".into(),
            })
        }
    }

    /// Study files recorded for `deck`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoStudies` if the deck has no recorded import or
    /// the import lists no files.
    pub fn studies_for(&self, deck: &str) -> Result<&ImportConfig, ConfigError> {
        self.imports
            .get(deck)
            .filter(|import| !import.files.is_empty())
            .ok_or_else(|| ConfigError::NoStudies {
                deck: deck.to_string(),
            })
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("drill").join("config.toml"))
    }
}
