//! Configuration schema types for `cardsmith.toml`
//!
//! Every section and field is optional; a missing file or an empty file
//! yields the defaults below.

use crate::artwork::DEFAULT_API_BASE;
use crate::layout::Effects;
use crate::metadata::{
    MetadataSettings, DEFAULT_CREATOR_ADDRESS, DEFAULT_SELLER_FEE_BASIS_POINTS, DEFAULT_SYMBOL,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Input and output locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Regular roster fixture (`{"pokemon": [...]}`)
    pub roster: PathBuf,
    /// Shining roster fixture (`{"shining": [...]}`)
    pub shining_roster: PathBuf,
    /// Card image directory; shining cards go to `shiny/` inside it
    pub output: PathBuf,
    /// Metadata directory; shining metadata goes to `shiny/` inside it
    pub metadata: PathBuf,
    /// Directory holding the bundled font files
    pub fonts: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            roster: PathBuf::from("data/pokemon.json"),
            shining_roster: PathBuf::from("data/shining.json"),
            output: PathBuf::from("cards"),
            metadata: PathBuf::from("metadata"),
            fonts: PathBuf::from("fonts"),
        }
    }
}

/// Where sprite artwork comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtworkConfig {
    /// Fetch artwork at all; when off, cards render without sprites
    pub enabled: bool,
    /// Sprite-data endpoint
    pub api_base: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Read artwork from this directory instead of the network
    pub directory: Option<PathBuf>,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self { enabled: true, api_base: DEFAULT_API_BASE.to_string(), timeout_secs: 10, directory: None }
    }
}

impl ArtworkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Optional render passes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Fixed seed for the random accents; entropy when unset
    pub seed: Option<u64>,
    pub texture: bool,
    pub glow: bool,
    pub accents: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { seed: None, texture: true, glow: true, accents: true }
    }
}

impl RenderConfig {
    /// Switch off the passes disabled here. Never enables a pass a style
    /// does not use.
    pub fn restrict(&self, effects: Effects) -> Effects {
        Effects {
            accents: effects.accents && self.accents,
            texture: effects.texture && self.texture,
            glow: effects.glow && self.glow,
            ..effects
        }
    }
}

/// Collection-wide metadata fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    pub symbol: String,
    pub seller_fee_basis_points: u32,
    pub creator_address: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            seller_fee_basis_points: DEFAULT_SELLER_FEE_BASIS_POINTS,
            creator_address: DEFAULT_CREATOR_ADDRESS.to_string(),
        }
    }
}

impl MetadataConfig {
    pub fn settings(&self) -> MetadataSettings {
        MetadataSettings {
            symbol: self.symbol.clone(),
            seller_fee_basis_points: self.seller_fee_basis_points,
            creator_address: self.creator_address.clone(),
        }
    }
}

/// Complete cardsmith.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardsmithConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub artwork: ArtworkConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "artwork.timeout_secs")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cardsmith.toml: '{}' {}", self.field, self.message)
    }
}

impl CardsmithConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: &str| {
            errors.push(ConfigValidationError { field: field.to_string(), message: message.to_string() });
        };

        if self.artwork.enabled && self.artwork.directory.is_none() {
            let base = self.artwork.api_base.as_str();
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                push("artwork.api_base", "must be an http:// or https:// URL");
            }
        }
        if self.artwork.timeout_secs == 0 {
            push("artwork.timeout_secs", "must be a positive integer");
        }
        if self.metadata.symbol.trim().is_empty() {
            push("metadata.symbol", "must be a non-empty string");
        }
        if self.metadata.seller_fee_basis_points > 10_000 {
            push("metadata.seller_fee_basis_points", "must be at most 10000 (100%)");
        }
        for (field, path) in [
            ("paths.roster", &self.paths.roster),
            ("paths.shining_roster", &self.paths.shining_roster),
            ("paths.output", &self.paths.output),
            ("paths.metadata", &self.paths.metadata),
        ] {
            if path.as_os_str().is_empty() {
                push(field, "must be a non-empty path");
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Make every relative path relative to `root` instead of the working
    /// directory.
    pub fn resolve_paths(&mut self, root: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        };
        resolve(&mut self.paths.roster);
        resolve(&mut self.paths.shining_roster);
        resolve(&mut self.paths.output);
        resolve(&mut self.paths.metadata);
        resolve(&mut self.paths.fonts);
        if let Some(dir) = self.artwork.directory.as_mut() {
            resolve(dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config: CardsmithConfig = toml::from_str("").unwrap();
        assert_eq!(config, CardsmithConfig::default());
        assert!(config.is_valid());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: CardsmithConfig = toml::from_str(
            r#"
[render]
seed = 42
glow = false

[paths]
output = "out/cards"
"#,
        )
        .unwrap();
        assert_eq!(config.render.seed, Some(42));
        assert!(!config.render.glow);
        assert!(config.render.texture);
        assert_eq!(config.paths.output, PathBuf::from("out/cards"));
        assert_eq!(config.paths.roster, PathBuf::from("data/pokemon.json"));
    }

    #[test]
    fn test_validation_errors() {
        let mut config = CardsmithConfig::default();
        config.artwork.api_base = "pokeapi.co".to_string();
        config.artwork.timeout_secs = 0;
        config.metadata.seller_fee_basis_points = 20_000;
        config.metadata.symbol = " ".to_string();
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "artwork.api_base",
                "artwork.timeout_secs",
                "metadata.symbol",
                "metadata.seller_fee_basis_points"
            ]
        );
    }

    #[test]
    fn test_api_base_not_checked_with_local_artwork() {
        let mut config = CardsmithConfig::default();
        config.artwork.api_base = String::new();
        config.artwork.directory = Some(PathBuf::from("sprites"));
        assert!(config.is_valid());
    }

    #[test]
    fn test_restrict_never_enables() {
        let render = RenderConfig { seed: None, texture: true, glow: false, accents: true };
        let effects = render.restrict(Effects { border_shine: true, ..Effects::NONE });
        assert_eq!(effects, Effects { border_shine: true, ..Effects::NONE });

        let full = Effects { accents: true, border_shine: false, texture: true, glow: true, gold_finish: false };
        let restricted = render.restrict(full);
        assert!(restricted.accents && restricted.texture && !restricted.glow);
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = CardsmithConfig::default();
        config.paths.output = PathBuf::from("/abs/cards");
        config.artwork.directory = Some(PathBuf::from("sprites"));
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.paths.roster, PathBuf::from("/project/data/pokemon.json"));
        assert_eq!(config.paths.output, PathBuf::from("/abs/cards"));
        assert_eq!(config.artwork.directory, Some(PathBuf::from("/project/sprites")));
    }

    #[test]
    fn test_metadata_settings() {
        let settings = MetadataConfig::default().settings();
        assert_eq!(settings, MetadataSettings::default());
    }
}
