//! Metadata command: write metadata sidecars without rendering

use std::process::ExitCode;

use crate::progress::ConsoleProgress;
use crate::roster::{self, load_roster, RosterKind};

use super::{load_settings, overrides_from, PathArgs, RosterChoice, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the metadata command
pub fn run_metadata(paths: &PathArgs, only: RosterChoice) -> ExitCode {
    let config = match load_settings(paths.config.as_deref(), &overrides_from(Some(paths), None)) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let reporter = ConsoleProgress::new();
    let settings = config.metadata.settings();
    let mut failed = 0;

    for &kind in only.kinds() {
        let roster_path = match kind {
            RosterKind::Regular => &config.paths.roster,
            RosterKind::Shining => &config.paths.shining_roster,
        };
        let loaded = match load_roster(roster_path, kind) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        };
        let summary = roster::run_metadata(kind, &loaded, &settings, &config.paths.metadata, &reporter);
        failed += summary.failures.len();
    }

    if failed > 0 {
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Metadata saved in: {}", config.paths.metadata.display());
    ExitCode::from(EXIT_SUCCESS)
}
