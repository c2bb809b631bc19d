//! Generate command: render both rosters to cards and metadata

use std::process::ExitCode;

use crate::fonts::{FontSet, FontSizes};
use crate::output::SHINY_DIR;
use crate::progress::{ConsoleProgress, ProgressReporter};
use crate::roster::{load_roster, prepare_output_dir, run_roster, RosterContext, RosterKind};

use super::{
    artwork_source, load_settings, make_rng, overrides_from, print_warnings, PathArgs, RenderArgs,
    RosterChoice, EXIT_ERROR, EXIT_SUCCESS,
};

/// Execute the generate command
pub fn run_generate(
    paths: &PathArgs,
    render: &RenderArgs,
    only: RosterChoice,
    clear: bool,
    verbose: bool,
) -> ExitCode {
    let config = match load_settings(paths.config.as_deref(), &overrides_from(Some(paths), Some(render))) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let (fonts, font_warnings) = FontSet::load(&config.paths.fonts, &FontSizes::STANDARD);
    print_warnings(&font_warnings);

    let artwork = match artwork_source(&config.artwork) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let reporter = ConsoleProgress::new().with_verbose(verbose);
    let mut rng = make_rng(config.render.seed);
    let ctx = RosterContext {
        fonts: &fonts,
        artwork: artwork.as_ref(),
        render: config.render.clone(),
        metadata: config.metadata.settings(),
        output_dir: config.paths.output.clone(),
        metadata_dir: config.paths.metadata.clone(),
    };

    let mut failed = 0;
    let mut written = 0;
    for &kind in only.kinds() {
        let roster_path = match kind {
            RosterKind::Regular => &config.paths.roster,
            RosterKind::Shining => &config.paths.shining_roster,
        };
        let roster = match load_roster(roster_path, kind) {
            Ok(roster) => roster,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        };

        let (card_dir, metadata_dir) = if kind.is_shining() {
            (ctx.output_dir.join(SHINY_DIR), ctx.metadata_dir.join(SHINY_DIR))
        } else {
            (ctx.output_dir.clone(), ctx.metadata_dir.clone())
        };
        for (dir, clear) in [(card_dir, clear), (metadata_dir, false)] {
            if let Err(e) = prepare_output_dir(&dir, clear) {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }

        let summary = run_roster(&ctx, kind, &roster, &mut rng, &reporter);
        written += summary.written;
        failed += summary.failures.len();
    }

    if reporter.is_verbose() {
        println!("Cards: {}", ctx.output_dir.display());
        println!("Metadata: {}", ctx.metadata_dir.display());
    }

    if failed > 0 {
        eprintln!("Error: {} of {} cards failed", failed, failed + written);
        return ExitCode::from(EXIT_ERROR);
    }
    ExitCode::from(EXIT_SUCCESS)
}
