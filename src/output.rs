//! PNG output and file path generation

use image::RgbImage;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Subdirectory holding shining cards and their metadata.
pub const SHINY_DIR: &str = "shiny";

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// File name of a card image, e.g. `Pikachu_nft.png`.
pub fn card_file_name(name: &str) -> String {
    format!("{}_nft.png", name)
}

/// Output path of a card image.
///
/// ```
/// use cardsmith::output::card_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(card_path(Path::new("out"), "Pikachu", false), PathBuf::from("out/Pikachu_nft.png"));
/// assert_eq!(card_path(Path::new("out"), "Pikachu", true), PathBuf::from("out/shiny/Pikachu_nft.png"));
/// ```
pub fn card_path(output_dir: &Path, name: &str, shiny: bool) -> PathBuf {
    let dir = if shiny { output_dir.join(SHINY_DIR) } else { output_dir.to_path_buf() };
    dir.join(card_file_name(name))
}

/// Save an opaque card image to a PNG file.
///
/// Parent directories are created as needed. An existing file is replaced.
pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), OutputError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}
