//! Artwork sources for the sprite step of the card pipeline.
//!
//! The pipeline asks an [`ArtworkSource`] for a creature's artwork and treats
//! any `Err` as "no artwork": the card still renders, with blank space where
//! the sprite would go.

use image::RgbaImage;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default sprite-data endpoint; the lowercased creature name is appended.
pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2/pokemon";

/// Default timeout for each HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("cardsmith/", env!("CARGO_PKG_VERSION"));

/// Why artwork could not be produced
#[derive(Debug, Error)]
pub enum FetchError {
    /// Artwork fetching is switched off
    #[error("artwork fetching is disabled")]
    Disabled,
    /// Transport-level failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Server answered with a non-200 status
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    /// Sprite-data document did not parse
    #[error("invalid sprite data: {0}")]
    Json(#[from] serde_json::Error),
    /// Sprite-data document has no artwork URL for the requested variant
    #[error("no {variant} artwork listed for '{name}'")]
    MissingArtwork { name: String, variant: &'static str },
    /// Artwork bytes are not a decodable image
    #[error("artwork could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
    /// Local artwork file could not be read
    #[error("artwork file {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

/// Something that can produce artwork for a creature.
pub trait ArtworkSource {
    /// Fetch the artwork for `name`, the shiny variant when `shiny` is set.
    fn fetch(&self, name: &str, shiny: bool) -> Result<RgbaImage, FetchError>;
}

/// A source that never has artwork. Used for offline runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoArtwork;

impl ArtworkSource for NoArtwork {
    fn fetch(&self, _name: &str, _shiny: bool) -> Result<RgbaImage, FetchError> {
        Err(FetchError::Disabled)
    }
}

#[derive(Debug, Deserialize)]
struct SpriteDocument {
    sprites: SpriteSet,
}

#[derive(Debug, Deserialize)]
struct SpriteSet {
    other: OtherSprites,
}

#[derive(Debug, Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork")]
    official_artwork: ArtworkUrls,
}

#[derive(Debug, Deserialize)]
struct ArtworkUrls {
    front_default: Option<String>,
    front_shiny: Option<String>,
}

/// Extract the official artwork URL from a sprite-data document.
///
/// ```
/// use cardsmith::artwork::artwork_url;
///
/// let doc = r#"{"sprites":{"other":{"official-artwork":{
///     "front_default":"https://example.test/25.png",
///     "front_shiny":"https://example.test/shiny/25.png"}}}}"#;
/// assert_eq!(artwork_url(doc, "pikachu", true).unwrap(), "https://example.test/shiny/25.png");
/// ```
pub fn artwork_url(document: &str, name: &str, shiny: bool) -> Result<String, FetchError> {
    let doc: SpriteDocument = serde_json::from_str(document)?;
    let urls = doc.sprites.other.official_artwork;
    let (url, variant) = if shiny {
        (urls.front_shiny, "shiny")
    } else {
        (urls.front_default, "default")
    };
    url.ok_or_else(|| FetchError::MissingArtwork { name: name.to_string(), variant })
}

/// Artwork from the public sprite API.
///
/// Two GETs per creature: the sprite-data document keyed by the lowercased
/// name, then the PNG it points to.
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    client: Client,
    api_base: String,
}

impl PokeApiClient {
    /// Build a client with the given endpoint and per-request timeout.
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).user_agent(USER_AGENT).build()?;
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Ok(Self { client, api_base })
    }

    /// URL of the sprite-data document for a creature.
    pub fn document_url(&self, name: &str) -> String {
        format!("{}/{}", self.api_base, name.trim().to_lowercase())
    }

    fn get_ok(&self, url: &str) -> Result<reqwest::blocking::Response, FetchError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }
        Ok(response)
    }
}

impl ArtworkSource for PokeApiClient {
    fn fetch(&self, name: &str, shiny: bool) -> Result<RgbaImage, FetchError> {
        let document = self.get_ok(&self.document_url(name))?.text()?;
        let url = artwork_url(&document, name, shiny)?;
        let bytes = self.get_ok(&url)?.bytes()?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }
}

/// Artwork read from a local directory of PNG files.
///
/// Looks for `{dir}/{name}.png`, or `{dir}/{name}_shiny.png` for the shiny
/// variant, with the name lowercased.
#[derive(Debug, Clone)]
pub struct DirectoryArtwork {
    dir: PathBuf,
}

impl DirectoryArtwork {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the artwork for a creature is expected at.
    pub fn path_for(&self, name: &str, shiny: bool) -> PathBuf {
        let stem = name.trim().to_lowercase();
        if shiny {
            self.dir.join(format!("{}_shiny.png", stem))
        } else {
            self.dir.join(format!("{}.png", stem))
        }
    }
}

impl ArtworkSource for DirectoryArtwork {
    fn fetch(&self, name: &str, shiny: bool) -> Result<RgbaImage, FetchError> {
        let path = self.path_for(name, shiny);
        let bytes = std::fs::read(&path).map_err(|source| FetchError::Io { path: path.clone(), source })?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }
}
