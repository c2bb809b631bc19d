//! Marketplace metadata sidecar for each card
//!
//! [`build`] is a pure function of the creature record; [`write_metadata`]
//! pretty-prints the document with 2-space indentation.

use crate::models::CreatureRecord;
use crate::output::{card_file_name, SHINY_DIR};
use crate::text::capitalize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default collection symbol.
pub const DEFAULT_SYMBOL: &str = "POKE";
/// Default royalty, 5%.
pub const DEFAULT_SELLER_FEE_BASIS_POINTS: u32 = 500;
/// Placeholder creator address.
pub const DEFAULT_CREATOR_ADDRESS: &str = "YOUR_CREATOR_ADDRESS";

/// Error type for metadata output
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to write {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to serialize metadata: {0}")]
    Json(#[from] serde_json::Error),
}

/// Collection-wide fields that are not derived from the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataSettings {
    pub symbol: String,
    pub seller_fee_basis_points: u32,
    pub creator_address: String,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            seller_fee_basis_points: DEFAULT_SELLER_FEE_BASIS_POINTS,
            creator_address: DEFAULT_CREATOR_ADDRESS.to_string(),
        }
    }
}

/// Attribute value: text for names and labels, a number for stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraitValue {
    Number(u32),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: TraitValue,
}

impl Attribute {
    fn text(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self { trait_type: trait_type.into(), value: TraitValue::Text(value.into()) }
    }

    fn number(trait_type: impl Into<String>, value: u32) -> Self {
        Self { trait_type: trait_type.into(), value: TraitValue::Number(value) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub uri: String,
    #[serde(rename = "type")]
    pub mime: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub address: String,
    pub share: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Properties {
    pub files: Vec<FileEntry>,
    pub category: String,
    pub creators: Vec<Creator>,
}

/// The JSON sidecar describing one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub seller_fee_basis_points: u32,
    pub image: String,
    pub attributes: Vec<Attribute>,
    pub properties: Properties,
}

/// Build the metadata document with default settings.
pub fn build(record: &CreatureRecord, shining: bool) -> CardMetadata {
    build_with(record, shining, &MetadataSettings::default())
}

/// Build the metadata document.
///
/// Attributes are always Type, HP, Attack, Defense, Rarity, then a name and
/// a damage entry per attack in record order.
///
/// Names use a single space (`"Pikachu Card"`). Older generated documents
/// spelled regular names with two (`"Pikachu  Card"`), so consumers matching
/// against those must normalize whitespace first.
pub fn build_with(record: &CreatureRecord, shining: bool, settings: &MetadataSettings) -> CardMetadata {
    let image = card_file_name(&record.name);
    let name = if shining {
        format!("{} Shining Card", record.name)
    } else {
        format!("{} Card", record.name)
    };

    let mut attributes = Vec::with_capacity(5 + 2 * record.attacks.len());
    attributes.push(Attribute::text("Type", capitalize(&record.kind)));
    attributes.push(Attribute::number("HP", record.hp));
    attributes.push(Attribute::number("Attack", record.attack));
    attributes.push(Attribute::number("Defense", record.defense));
    attributes.push(Attribute::text("Rarity", if shining { "Shining" } else { "Regular" }));
    for (i, attack) in record.attacks.iter().enumerate() {
        attributes.push(Attribute::text(format!("Attack {} Name", i + 1), attack.name.clone()));
        attributes.push(Attribute::number(format!("Attack {} Damage", i + 1), attack.damage));
    }

    CardMetadata {
        name,
        symbol: settings.symbol.clone(),
        description: record.flavor_text.clone(),
        seller_fee_basis_points: settings.seller_fee_basis_points,
        image: image.clone(),
        attributes,
        properties: Properties {
            files: vec![FileEntry { uri: image, mime: "image/png".to_string() }],
            category: "image".to_string(),
            creators: vec![Creator { address: settings.creator_address.clone(), share: 100 }],
        },
    }
}

/// Output path of a metadata document.
///
/// ```
/// use cardsmith::metadata::metadata_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     metadata_path(Path::new("meta"), "Gengar", true),
///     PathBuf::from("meta/shiny/Gengar_metadata.json")
/// );
/// ```
pub fn metadata_path(metadata_dir: &Path, name: &str, shiny: bool) -> PathBuf {
    let dir = if shiny { metadata_dir.join(SHINY_DIR) } else { metadata_dir.to_path_buf() };
    dir.join(format!("{}_metadata.json", name))
}

/// Serialize a document exactly as written to disk.
pub fn to_json(doc: &CardMetadata) -> Result<String, MetadataError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Write a document with 2-space indentation, creating parent directories.
pub fn write_metadata(doc: &CardMetadata, path: &Path) -> Result<(), MetadataError> {
    let json = to_json(doc)?;
    let io_err = |source| MetadataError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    std::fs::write(path, json).map_err(io_err)
}
