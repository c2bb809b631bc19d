//! Roster driver: fixtures in, card images and metadata out.
//!
//! A roster is a JSON fixture holding a list of creature records under a
//! single key: `{"pokemon": [...]}` for regular cards and
//! `{"shining": [...]}` for shining cards. Problems with one entry or one
//! card are reported and skipped; only an unreadable fixture or an unusable
//! output directory stops a run.

use crate::artwork::ArtworkSource;
use crate::card::{CardRenderer, Warning};
use crate::config::RenderConfig;
use crate::fonts::FontSet;
use crate::layout::CardStyle;
use crate::metadata::{build_with, metadata_path, write_metadata, MetadataError, MetadataSettings};
use crate::models::CreatureRecord;
use crate::output::{card_path, save_png, OutputError};
use crate::progress::{CardStatus, ProgressEvent, ProgressReporter};
use rand::Rng;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Which of the two rosters a fixture holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterKind {
    Regular,
    Shining,
}

impl RosterKind {
    /// Top-level key of the fixture.
    pub fn key(&self) -> &'static str {
        match self {
            RosterKind::Regular => "pokemon",
            RosterKind::Shining => "shining",
        }
    }

    pub fn style(&self) -> CardStyle {
        match self {
            RosterKind::Regular => CardStyle::Standard,
            RosterKind::Shining => CardStyle::Shining,
        }
    }

    /// Whether outputs go to the `shiny/` subdirectories.
    pub fn is_shining(&self) -> bool {
        matches!(self, RosterKind::Shining)
    }
}

impl fmt::Display for RosterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterKind::Regular => write!(f, "regular"),
            RosterKind::Shining => write!(f, "shining"),
        }
    }
}

/// Error that stops a whole roster
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("roster {path} is not valid JSON: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("roster {path} has no '{key}' list")]
    MissingKey { path: PathBuf, key: &'static str },
    #[error("failed to prepare {path}: {source}")]
    OutputDir { path: PathBuf, source: std::io::Error },
}

/// Error that costs a single card
#[derive(Debug, Error)]
pub enum CardError {
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Records read from a fixture, plus one warning per skipped entry.
#[derive(Debug, Clone, Default)]
pub struct LoadedRoster {
    pub records: Vec<CreatureRecord>,
    pub warnings: Vec<Warning>,
}

/// Read a roster fixture from disk.
pub fn load_roster(path: &Path, kind: RosterKind) -> Result<LoadedRoster, RosterError> {
    let contents =
        std::fs::read_to_string(path).map_err(|source| RosterError::Io { path: path.to_path_buf(), source })?;
    parse_roster(&contents, kind, path)
}

/// Parse a roster fixture.
///
/// Null entries, entries without a `name` and entries that do not describe a
/// creature are skipped with a warning. `source` only appears in messages.
pub fn parse_roster(json: &str, kind: RosterKind, source: &Path) -> Result<LoadedRoster, RosterError> {
    let document: Value =
        serde_json::from_str(json).map_err(|e| RosterError::Json { path: source.to_path_buf(), source: e })?;
    let entries = document
        .get(kind.key())
        .and_then(Value::as_array)
        .ok_or_else(|| RosterError::MissingKey { path: source.to_path_buf(), key: kind.key() })?;

    let mut loaded = LoadedRoster::default();
    for (index, entry) in entries.iter().enumerate() {
        let Some(name) = entry.get("name").and_then(Value::as_str) else {
            loaded.warnings.push(Warning::new(format!(
                "{} roster entry {} has no name, skipping",
                kind, index
            )));
            continue;
        };
        match serde_json::from_value::<CreatureRecord>(entry.clone()) {
            Ok(record) => loaded.records.push(record),
            Err(e) => loaded.warnings.push(Warning::new(format!("Skipping '{}': {}", name, e))),
        }
    }
    Ok(loaded)
}

/// Create an output directory, optionally removing previously generated cards.
///
/// Only `*_nft.png` files directly inside `dir` are removed. Returns the
/// number of files removed.
pub fn prepare_output_dir(dir: &Path, clear: bool) -> Result<usize, RosterError> {
    let io_err = |source| RosterError::OutputDir { path: dir.to_path_buf(), source };
    std::fs::create_dir_all(dir).map_err(io_err)?;
    if !clear {
        return Ok(0);
    }

    let pattern = format!("{}/*_nft.png", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut removed = 0;
    if let Ok(paths) = glob::glob(&pattern) {
        for path in paths.filter_map(Result::ok) {
            if path.is_file() {
                std::fs::remove_file(&path).map_err(io_err)?;
                removed += 1;
            }
        }
    }
    Ok(removed)
}

/// Everything a roster run shares between cards.
pub struct RosterContext<'a> {
    pub fonts: &'a FontSet,
    pub artwork: &'a dyn ArtworkSource,
    pub render: RenderConfig,
    pub metadata: MetadataSettings,
    pub output_dir: PathBuf,
    pub metadata_dir: PathBuf,
}

/// A card that could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFailure {
    pub name: String,
    pub error: String,
}

/// Outcome of a roster run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSummary {
    pub roster: RosterKind,
    pub written: usize,
    pub failures: Vec<CardFailure>,
    pub warnings: usize,
}

impl RosterSummary {
    fn new(roster: RosterKind) -> Self {
        Self { roster, written: 0, failures: Vec::new(), warnings: 0 }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Tracks names already produced in a run; a repeated name overwrites.
struct DuplicateNames(HashSet<String>);

impl DuplicateNames {
    fn check(&mut self, name: &str, reporter: &dyn ProgressReporter, summary: &mut RosterSummary) {
        if !self.0.insert(name.to_string()) {
            summary.warnings += 1;
            reporter.report(ProgressEvent::Warning {
                card: Some(name.to_string()),
                message: "duplicate name, the earlier card is overwritten".to_string(),
            });
        }
    }
}

fn report_warnings(
    card: Option<&str>,
    warnings: &[Warning],
    reporter: &dyn ProgressReporter,
    summary: &mut RosterSummary,
) {
    for warning in warnings {
        summary.warnings += 1;
        reporter.report(ProgressEvent::Warning {
            card: card.map(str::to_string),
            message: warning.message.clone(),
        });
    }
}

fn record_failure(
    name: &str,
    error: String,
    reporter: &dyn ProgressReporter,
    summary: &mut RosterSummary,
) -> CardStatus {
    reporter.report(ProgressEvent::Error { card: Some(name.to_string()), message: error.clone() });
    summary.failures.push(CardFailure { name: name.to_string(), error: error.clone() });
    CardStatus::Failed(error)
}

fn write_card(
    ctx: &RosterContext<'_>,
    kind: RosterKind,
    record: &CreatureRecord,
    image: &image::RgbImage,
) -> Result<(), CardError> {
    save_png(image, &card_path(&ctx.output_dir, &record.name, kind.is_shining()))?;
    let doc = build_with(record, kind.is_shining(), &ctx.metadata);
    write_metadata(&doc, &metadata_path(&ctx.metadata_dir, &record.name, kind.is_shining()))?;
    Ok(())
}

/// Render every record, then write its image and metadata.
///
/// The loader warnings of `roster` are reported before the first card.
pub fn run_roster<R: Rng + ?Sized>(
    ctx: &RosterContext<'_>,
    kind: RosterKind,
    roster: &LoadedRoster,
    rng: &mut R,
    reporter: &dyn ProgressReporter,
) -> RosterSummary {
    let started = Instant::now();
    let mut summary = RosterSummary::new(kind);
    let style = kind.style();
    let renderer = CardRenderer::new(style, ctx.fonts).with_effects(ctx.render.restrict(style.default_effects()));
    let mut seen = DuplicateNames(HashSet::new());

    reporter.report(ProgressEvent::RosterStarted { roster: kind.to_string(), total_cards: roster.records.len() });
    report_warnings(None, &roster.warnings, reporter, &mut summary);

    for record in &roster.records {
        let card_started = Instant::now();
        reporter.report(ProgressEvent::CardStarted { card: record.name.clone() });
        seen.check(&record.name, reporter, &mut summary);

        let rendered = renderer.render(record, ctx.artwork, rng);
        report_warnings(Some(&record.name), &rendered.warnings, reporter, &mut summary);

        let status = match write_card(ctx, kind, record, &rendered.image) {
            Ok(()) => {
                summary.written += 1;
                CardStatus::Written
            }
            Err(e) => record_failure(&record.name, e.to_string(), reporter, &mut summary),
        };
        reporter.report(ProgressEvent::CardCompleted {
            card: record.name.clone(),
            status,
            duration_ms: card_started.elapsed().as_millis() as u64,
        });
    }

    reporter.report(ProgressEvent::RosterCompleted {
        roster: kind.to_string(),
        succeeded: summary.written,
        failed: summary.failures.len(),
        duration_ms: started.elapsed().as_millis() as u64,
    });
    summary
}

/// Write metadata only, without rendering images.
pub fn run_metadata(
    kind: RosterKind,
    roster: &LoadedRoster,
    settings: &MetadataSettings,
    metadata_dir: &Path,
    reporter: &dyn ProgressReporter,
) -> RosterSummary {
    let started = Instant::now();
    let mut summary = RosterSummary::new(kind);
    let mut seen = DuplicateNames(HashSet::new());

    reporter.report(ProgressEvent::RosterStarted { roster: kind.to_string(), total_cards: roster.records.len() });
    report_warnings(None, &roster.warnings, reporter, &mut summary);

    for record in &roster.records {
        let card_started = Instant::now();
        seen.check(&record.name, reporter, &mut summary);
        let doc = build_with(record, kind.is_shining(), settings);
        let status = match write_metadata(&doc, &metadata_path(metadata_dir, &record.name, kind.is_shining())) {
            Ok(()) => {
                summary.written += 1;
                CardStatus::Written
            }
            Err(e) => record_failure(&record.name, e.to_string(), reporter, &mut summary),
        };
        reporter.report(ProgressEvent::CardCompleted {
            card: record.name.clone(),
            status,
            duration_ms: card_started.elapsed().as_millis() as u64,
        });
    }

    reporter.report(ProgressEvent::RosterCompleted {
        roster: kind.to_string(),
        succeeded: summary.written,
        failed: summary.failures.len(),
        duration_ms: started.elapsed().as_millis() as u64,
    });
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::NoArtwork;
    use crate::progress::NullProgress;
    use std::cell::RefCell;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    const REGULAR: &str = r#"{"pokemon": [
        {"name": "Pikachu", "type": "electric", "hp": 110, "attack": 90, "defense": 60,
         "attacks": [{"name": "Thunderbolt", "damage": 80}, {"name": "Quick Attack", "damage": 60}],
         "text": "It stores electricity in its cheeks."},
        {"name": "Gengar", "type": "ghost", "hp": 120, "attack": 100, "defense": 120,
         "attacks": [{"name": "Shadow Ball", "damage": 80}, {"name": "Night Shade", "damage": 70}],
         "text": "It hides in shadows."}
    ]}"#;

    #[test]
    fn test_parse_regular_roster() {
        let loaded = parse_roster(REGULAR, RosterKind::Regular, Path::new("pokemon.json")).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[1].name, "Gengar");
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_shining_roster_skips_null_and_nameless() {
        let json = r#"{"shining": [
            null,
            {"type": "fire"},
            {"name": "Charizard", "type": "fire", "hp": 150, "attack": 120, "defense": 100,
             "attacks": [{"name": "Flamethrower", "damage": 90}, {"name": "Wing Attack", "damage": 60}],
             "text": "Its flame burns brighter."}
        ]}"#;
        let loaded = parse_roster(json, RosterKind::Shining, Path::new("shining.json")).unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].name, "Charizard");
        assert_eq!(loaded.warnings.len(), 2);
    }

    #[test]
    fn test_malformed_entry_is_skipped_by_name() {
        let json = r#"{"pokemon": [{"name": "Missingno", "type": "bird", "hp": -1}]}"#;
        let loaded = parse_roster(json, RosterKind::Regular, Path::new("p.json")).unwrap();
        assert!(loaded.records.is_empty());
        assert!(loaded.warnings[0].message.contains("Missingno"));
    }

    #[test]
    fn test_wrong_key_is_an_error() {
        let result = parse_roster(REGULAR, RosterKind::Shining, Path::new("p.json"));
        assert!(matches!(result, Err(RosterError::MissingKey { key: "shining", .. })));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let result = parse_roster("{", RosterKind::Regular, Path::new("p.json"));
        assert!(matches!(result, Err(RosterError::Json { .. })));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = load_roster(&dir.path().join("none.json"), RosterKind::Regular);
        assert!(matches!(result, Err(RosterError::Io { .. })));
    }

    #[test]
    fn test_prepare_output_dir_clears_only_cards() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("cards");
        prepare_output_dir(&out, false).unwrap();
        std::fs::write(out.join("Pikachu_nft.png"), b"x").unwrap();
        std::fs::write(out.join("notes.txt"), b"x").unwrap();

        assert_eq!(prepare_output_dir(&out, true).unwrap(), 1);
        assert!(!out.join("Pikachu_nft.png").exists());
        assert!(out.join("notes.txt").exists());
    }

    #[test]
    fn test_run_roster_writes_cards_and_metadata() {
        let dir = tempdir().unwrap();
        let fonts = FontSet::builtin();
        let ctx = RosterContext {
            fonts: &fonts,
            artwork: &NoArtwork,
            render: RenderConfig { seed: None, texture: false, glow: false, accents: true },
            metadata: MetadataSettings::default(),
            output_dir: dir.path().join("cards"),
            metadata_dir: dir.path().join("metadata"),
        };
        let roster = parse_roster(REGULAR, RosterKind::Regular, Path::new("p.json")).unwrap();
        let summary = run_roster(&ctx, RosterKind::Regular, &roster, &mut StdRng::seed_from_u64(1), &NullProgress);

        assert!(summary.is_success());
        assert_eq!(summary.written, 2);
        assert!(dir.path().join("cards/Pikachu_nft.png").is_file());
        assert!(dir.path().join("metadata/Gengar_metadata.json").is_file());
    }

    #[test]
    fn test_run_roster_isolates_failures() {
        let dir = tempdir().unwrap();
        // A file where the shiny output directory should be
        std::fs::create_dir_all(dir.path().join("cards")).unwrap();
        std::fs::write(dir.path().join("cards/shiny"), b"blocker").unwrap();

        let fonts = FontSet::builtin();
        let ctx = RosterContext {
            fonts: &fonts,
            artwork: &NoArtwork,
            render: RenderConfig::default(),
            metadata: MetadataSettings::default(),
            output_dir: dir.path().join("cards"),
            metadata_dir: dir.path().join("metadata"),
        };
        let json = REGULAR.replace("\"pokemon\"", "\"shining\"");
        let roster = parse_roster(&json, RosterKind::Shining, Path::new("s.json")).unwrap();
        let summary = run_roster(&ctx, RosterKind::Shining, &roster, &mut StdRng::seed_from_u64(1), &NullProgress);

        assert!(!summary.is_success());
        assert_eq!(summary.written, 0);
        assert_eq!(summary.failures.len(), 2);
        assert_eq!(summary.failures[0].name, "Pikachu");
    }

    #[derive(Default)]
    struct Recorder(RefCell<Vec<ProgressEvent>>);

    impl ProgressReporter for Recorder {
        fn report(&self, event: ProgressEvent) {
            self.0.borrow_mut().push(event);
        }
    }

    #[test]
    fn test_failed_card_reports_error_event() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("blocked"), b"not a directory").unwrap();

        let roster = parse_roster(REGULAR, RosterKind::Regular, Path::new("p.json")).unwrap();
        let recorder = Recorder::default();
        let summary = run_metadata(
            RosterKind::Regular,
            &roster,
            &MetadataSettings::default(),
            &dir.path().join("blocked"),
            &recorder,
        );

        assert_eq!(summary.failures.len(), 2);
        let events = recorder.0.borrow();
        let errors: Vec<&str> = events
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::Error { card: Some(card), .. } => Some(card.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(errors, ["Pikachu", "Gengar"]);
        assert!(events.iter().any(|event| matches!(
            event,
            ProgressEvent::CardCompleted { card, status: CardStatus::Failed(_), .. } if card == "Gengar"
        )));
    }

    #[test]
    fn test_duplicate_names_warn_and_overwrite() {
        let dir = tempdir().unwrap();
        let mut roster = parse_roster(REGULAR, RosterKind::Regular, Path::new("p.json")).unwrap();
        roster.records.push(roster.records[0].clone());

        let summary = run_metadata(
            RosterKind::Regular,
            &roster,
            &MetadataSettings::default(),
            dir.path(),
            &NullProgress,
        );
        assert_eq!(summary.written, 3);
        assert_eq!(summary.warnings, 1);
        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 2);
    }

    #[test]
    fn test_run_metadata_shiny_directory() {
        let dir = tempdir().unwrap();
        let json = REGULAR.replace("\"pokemon\"", "\"shining\"");
        let roster = parse_roster(&json, RosterKind::Shining, Path::new("s.json")).unwrap();
        let summary =
            run_metadata(RosterKind::Shining, &roster, &MetadataSettings::default(), dir.path(), &NullProgress);
        assert!(summary.is_success());
        let text = std::fs::read_to_string(dir.path().join("shiny/Pikachu_metadata.json")).unwrap();
        assert!(text.contains("\"Pikachu Shining Card\""));
    }
}
