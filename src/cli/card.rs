//! Card command: prompt for one creature and render a small card

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;

use crate::card::CardRenderer;
use crate::fonts::{FontSet, FontSizes};
use crate::layout::CardStyle;
use crate::models::CreatureRecord;
use crate::output::{card_path, save_png};
use crate::palette::PaletteTable;

use super::{
    artwork_source, load_settings, make_rng, overrides_from, print_warnings, RenderArgs, EXIT_ERROR,
    EXIT_INVALID_ARGS, EXIT_SUCCESS,
};

/// Execute the card command
pub fn run_card(config_path: Option<&Path>, render: &RenderArgs) -> ExitCode {
    let config = match load_settings(config_path, &overrides_from(None, Some(render))) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let record = match prompt_record(&mut stdin.lock(), &mut stdout, &PaletteTable::new()) {
        Ok(record) => record,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            eprintln!("Error: input ended before the card was complete");
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let (fonts, font_warnings) = FontSet::load(&config.paths.fonts, &FontSizes::LEGACY);
    print_warnings(&font_warnings);
    let artwork = match artwork_source(&config.artwork) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let style = CardStyle::Legacy;
    let renderer = CardRenderer::new(style, &fonts).with_effects(config.render.restrict(style.default_effects()));
    let card = renderer.render(&record, artwork.as_ref(), &mut make_rng(config.render.seed));
    print_warnings(&card.warnings);

    let path = card_path(&config.paths.output, &record.name, false);
    if let Err(e) = save_png(&card.image, &path) {
        eprintln!("Error: Failed to save '{}': {}", path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Card saved as {}", path.display());
    ExitCode::from(EXIT_SUCCESS)
}

/// Ask for every field of a card.
///
/// Invalid types, attack counts other than 2 or 3, and values that are not
/// non-negative integers are asked for again. Running out of input is an
/// `UnexpectedEof` error.
pub fn prompt_record<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    palette: &PaletteTable,
) -> io::Result<CreatureRecord> {
    let name = ask(input, output, "Enter the name of your card (e.g., 'Charizard'): ")?;

    let types = palette.type_names().join(", ");
    let kind = loop {
        let answer = ask(input, output, &format!("Enter the type [{}]: ", types))?.to_lowercase();
        if palette.is_known(&answer) {
            break answer;
        }
        writeln!(output, "Invalid type! Please choose from the available types.")?;
    };

    let attack: u32 = ask_number(input, output, "Enter the attack value: ")?;
    let defense: u32 = ask_number(input, output, "Enter the defense value: ")?;
    let hp: u32 = ask_number(input, output, "Enter the HP value: ")?;

    let count = loop {
        let count: usize = ask_number(input, output, "Enter the number of attacks (2 or 3): ")?;
        if count == 2 || count == 3 {
            break count;
        }
        writeln!(output, "Please enter either 2 or 3 for the number of attacks.")?;
    };

    let mut attacks = Vec::with_capacity(count);
    for i in 1..=count {
        let attack_name = ask(input, output, &format!("Enter name for Attack {}: ", i))?;
        let damage: u32 = ask_number(input, output, &format!("Enter damage for Attack {}: ", i))?;
        attacks.push((attack_name, damage));
    }

    Ok(CreatureRecord::from_legacy(&name, &kind, attack, defense, hp, &attacks))
}

/// Print a prompt and read one trimmed line.
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no more input"));
    }
    Ok(line.trim().to_string())
}

/// Ask until the answer parses.
fn ask_number<T: FromStr, R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<T> {
    loop {
        let answer = ask(input, output, prompt)?;
        match answer.parse() {
            Ok(value) => return Ok(value),
            Err(_) => writeln!(output, "Please enter a whole number.")?,
        }
    }
}
