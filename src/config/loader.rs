//! Configuration loading and discovery for `cardsmith.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::CardsmithConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "cardsmith.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse cardsmith.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub roster: Option<PathBuf>,
    pub shining_roster: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub metadata: Option<PathBuf>,
    pub fonts: Option<PathBuf>,
    /// Fixed seed for the random accents
    pub seed: Option<u64>,
    /// Read artwork from a local directory
    pub artwork_dir: Option<PathBuf>,
    /// Skip artwork entirely
    pub offline: Option<bool>,
}

/// Find cardsmith.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for cardsmith.toml
/// 2. Check XDG_CONFIG_HOME/cardsmith/cardsmith.toml (or ~/.config/cardsmith/cardsmith.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find cardsmith.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("cardsmith").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find cardsmith.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// [`find_config`] to locate one. If no config file is found, returns the
/// defaults, with paths relative to the working directory. Paths in a loaded
/// file are relative to the directory holding the file.
///
/// # Example
/// ```no_run
/// use cardsmith::config::load_config;
///
/// let config = load_config(None)?;
/// println!("cards go to {}", config.paths.output.display());
/// # Ok::<(), cardsmith::config::ConfigError>(())
/// ```
pub fn load_config(path: Option<&Path>) -> Result<CardsmithConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(CardsmithConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<CardsmithConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: CardsmithConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(root) = project_root(path) {
        config.resolve_paths(root);
    }
    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut CardsmithConfig, overrides: &CliOverrides) {
    if let Some(ref roster) = overrides.roster {
        config.paths.roster = roster.clone();
    }
    if let Some(ref shining) = overrides.shining_roster {
        config.paths.shining_roster = shining.clone();
    }
    if let Some(ref output) = overrides.output {
        config.paths.output = output.clone();
    }
    if let Some(ref metadata) = overrides.metadata {
        config.paths.metadata = metadata.clone();
    }
    if let Some(ref fonts) = overrides.fonts {
        config.paths.fonts = fonts.clone();
    }
    if let Some(seed) = overrides.seed {
        config.render.seed = Some(seed);
    }
    if let Some(ref dir) = overrides.artwork_dir {
        config.artwork.directory = Some(dir.clone());
        config.artwork.enabled = true;
    }
    // Offline wins over a local artwork directory
    if let Some(offline) = overrides.offline {
        if offline {
            config.artwork.enabled = false;
        }
    }
}

/// Directory holding a config file; an empty parent means the working directory.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent().filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(contents.as_bytes())
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");
        assert_eq!(find_config_from(temp.path().to_path_buf()), Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");
        let subdir = temp.path().join("data").join("fixtures");
        fs::create_dir_all(&subdir).expect("should create subdirectories");
        assert_eq!(find_config_from(subdir), Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        assert_eq!(find_config_from(temp.path().to_path_buf()), None);
    }

    #[test]
    fn test_load_config_from_file_resolves_paths() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            r#"
[paths]
roster = "fixtures/regular.json"
output = "/srv/cards"

[artwork]
timeout_secs = 3

[metadata]
symbol = "CARD"
"#,
        );

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(config.paths.roster, temp.path().join("fixtures/regular.json"));
        assert_eq!(config.paths.output, PathBuf::from("/srv/cards"));
        assert_eq!(config.paths.metadata, temp.path().join("metadata"));
        assert_eq!(config.artwork.timeout_secs, 3);
        assert_eq!(config.metadata.symbol, "CARD");
    }

    #[test]
    fn test_load_config_missing_explicit_file_errors() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("nonexistent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "this is not valid toml {{{");
        assert!(matches!(load_config(Some(&config_path)), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_wrong_type_is_parse_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[render]\nseed = \"abc\"\n");
        assert!(matches!(load_config(Some(&config_path)), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[artwork]\ntimeout_secs = 0\n");
        let err = load_config(Some(&config_path)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("artwork.timeout_secs"));
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = CardsmithConfig::default();
        let overrides = CliOverrides {
            output: Some(PathBuf::from("dist")),
            seed: Some(7),
            artwork_dir: Some(PathBuf::from("sprites")),
            ..Default::default()
        };
        merge_cli_overrides(&mut config, &overrides);
        assert_eq!(config.paths.output, PathBuf::from("dist"));
        assert_eq!(config.paths.roster, PathBuf::from("data/pokemon.json"));
        assert_eq!(config.render.seed, Some(7));
        assert_eq!(config.artwork.directory, Some(PathBuf::from("sprites")));
        assert!(config.artwork.enabled);
    }

    #[test]
    fn test_offline_override_disables_artwork() {
        let mut config = CardsmithConfig::default();
        let overrides =
            CliOverrides { offline: Some(true), artwork_dir: Some(PathBuf::from("s")), ..Default::default() };
        merge_cli_overrides(&mut config, &overrides);
        assert!(!config.artwork.enabled);
    }

    #[test]
    fn test_project_root() {
        assert_eq!(project_root(Path::new("/a/b/cardsmith.toml")), Some(Path::new("/a/b")));
        assert_eq!(project_root(Path::new("cardsmith.toml")), None);
    }
}
