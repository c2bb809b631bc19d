//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod card;
mod generate;
mod metadata;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::artwork::{ArtworkSource, DirectoryArtwork, FetchError, NoArtwork, PokeApiClient};
use crate::card::Warning;
use crate::config::{load_config, merge_cli_overrides, ArtworkConfig, CardsmithConfig, CliOverrides};
use crate::roster::RosterKind;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// cardsmith - Render creature trading cards and their metadata
#[derive(Parser)]
#[command(name = "cardsmith")]
#[command(about = "cardsmith - Render creature trading cards and their metadata")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Which roster a command works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RosterChoice {
    Regular,
    Shining,
    Both,
}

impl RosterChoice {
    fn kinds(self) -> &'static [RosterKind] {
        match self {
            RosterChoice::Regular => &[RosterKind::Regular],
            RosterChoice::Shining => &[RosterKind::Shining],
            RosterChoice::Both => &[RosterKind::Regular, RosterKind::Shining],
        }
    }
}

/// Options shared by the roster commands
#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Config file (default: cardsmith.toml found by walking up from here)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Regular roster fixture
    #[arg(long)]
    pub roster: Option<PathBuf>,

    /// Shining roster fixture
    #[arg(long)]
    pub shining_roster: Option<PathBuf>,

    /// Metadata output directory
    #[arg(long)]
    pub metadata: Option<PathBuf>,
}

/// Options controlling how cards are rendered
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Card image output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory holding the bundled fonts
    #[arg(long)]
    pub fonts: Option<PathBuf>,

    /// Seed for the random accents (same seed, same pixels)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Read artwork from `{dir}/{name}.png` instead of the sprite API
    #[arg(long)]
    pub artwork_dir: Option<PathBuf>,

    /// Render without artwork
    #[arg(long)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render every card of the rosters, with metadata
    Generate {
        #[command(flatten)]
        paths: PathArgs,

        #[command(flatten)]
        render: RenderArgs,

        /// Which roster to generate
        #[arg(long, value_enum, default_value = "both")]
        only: RosterChoice,

        /// Remove previously generated cards from the output directories first
        #[arg(long)]
        clear: bool,

        /// Print every card as it starts
        #[arg(short, long)]
        verbose: bool,
    },

    /// Build one small card interactively
    Card {
        /// Config file (default: cardsmith.toml found by walking up from here)
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Write metadata for the rosters without rendering images
    Metadata {
        #[command(flatten)]
        paths: PathArgs,

        /// Which roster to process
        #[arg(long, value_enum, default_value = "both")]
        only: RosterChoice,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { paths, render, only, clear, verbose } => {
            generate::run_generate(&paths, &render, only, clear, verbose)
        }
        Commands::Card { config, render } => card::run_card(config.as_deref(), &render),
        Commands::Metadata { paths, only } => metadata::run_metadata(&paths, only),
    }
}

/// Load the config file and apply command-line overrides.
pub(crate) fn load_settings(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<CardsmithConfig, ExitCode> {
    let mut config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    merge_cli_overrides(&mut config, overrides);
    Ok(config)
}

pub(crate) fn overrides_from(paths: Option<&PathArgs>, render: Option<&RenderArgs>) -> CliOverrides {
    let mut overrides = CliOverrides::default();
    if let Some(paths) = paths {
        overrides.roster = paths.roster.clone();
        overrides.shining_roster = paths.shining_roster.clone();
        overrides.metadata = paths.metadata.clone();
    }
    if let Some(render) = render {
        overrides.output = render.output.clone();
        overrides.fonts = render.fonts.clone();
        overrides.seed = render.seed;
        overrides.artwork_dir = render.artwork_dir.clone();
        overrides.offline = Some(render.offline);
    }
    overrides
}

/// Build the artwork source the configuration asks for.
pub(crate) fn artwork_source(config: &ArtworkConfig) -> Result<Box<dyn ArtworkSource>, FetchError> {
    if !config.enabled {
        return Ok(Box::new(NoArtwork));
    }
    match &config.directory {
        Some(dir) => Ok(Box::new(DirectoryArtwork::new(dir))),
        None => Ok(Box::new(PokeApiClient::new(config.api_base.clone(), config.timeout())?)),
    }
}

/// Seeded generator when a seed is configured, entropy otherwise.
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub(crate) fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
}
