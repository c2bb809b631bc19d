//! CLI integration tests
//!
//! These run the binary against the bundled rosters with artwork disabled
//! and check what lands on disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn cardsmith() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cardsmith"))
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

/// A config pointing at the bundled rosters, with everything else in `dir`.
fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("cardsmith.toml");
    let body = format!(
        "[paths]\nroster = {:?}\nshining_roster = {:?}\noutput = \"out\"\nmetadata = \"meta\"\nfonts = \"fonts\"\n\n[artwork]\nenabled = false\n",
        fixture("pokemon.json"),
        fixture("shining.json"),
    );
    fs::write(&path, body).expect("write config");
    path
}

fn image_dimensions(path: &Path) -> (u32, u32) {
    let img = image::open(path).expect("Failed to open output image");
    (img.width(), img.height())
}

fn generate(dir: &TempDir, seed: &str, out: &str) -> Output {
    let config = write_config(dir.path());
    cardsmith()
        .current_dir(dir.path())
        .arg("generate")
        .arg("--config")
        .arg(&config)
        .args(["--offline", "--seed", seed, "-o"])
        .arg(dir.path().join(out))
        .output()
        .expect("Failed to execute cardsmith")
}

#[test]
fn test_generate_writes_both_rosters() {
    let dir = TempDir::new().unwrap();
    let output = generate(&dir, "7", "out");
    assert!(output.status.success(), "generate failed: {}", String::from_utf8_lossy(&output.stderr));

    for name in ["Charizard", "Blastoise", "Venusaur", "Pikachu", "Gengar", "Mewtwo"] {
        let card = dir.path().join("out").join(format!("{}_nft.png", name));
        assert_eq!(image_dimensions(&card), (750, 1050), "{}", name);
        assert!(dir.path().join("meta").join(format!("{}_metadata.json", name)).is_file());
    }
    for name in ["Rayquaza", "Gyarados"] {
        assert!(dir.path().join("out/shiny").join(format!("{}_nft.png", name)).is_file());
        assert!(dir.path().join("meta/shiny").join(format!("{}_metadata.json", name)).is_file());
    }
}

#[test]
fn test_generate_same_seed_same_bytes() {
    let dir = TempDir::new().unwrap();
    assert!(generate(&dir, "99", "first").status.success());
    assert!(generate(&dir, "99", "second").status.success());

    let first = fs::read(dir.path().join("first/Mewtwo_nft.png")).unwrap();
    let second = fs::read(dir.path().join("second/Mewtwo_nft.png")).unwrap();
    assert!(first == second, "seeded runs should produce identical cards");
}

#[test]
fn test_generate_clear_removes_stale_cards() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("Missingno_nft.png"), b"stale").unwrap();
    fs::write(out.join("notes.txt"), b"keep").unwrap();

    let config = write_config(dir.path());
    let output = cardsmith()
        .current_dir(dir.path())
        .args(["generate", "--only", "regular", "--clear", "--offline", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success(), "generate failed: {}", String::from_utf8_lossy(&output.stderr));

    assert!(!out.join("Missingno_nft.png").exists());
    assert!(out.join("notes.txt").exists());
    assert!(out.join("Pikachu_nft.png").exists());
    assert!(!out.join("shiny").exists());
}

#[test]
fn test_generate_empty_rosters() {
    let dir = TempDir::new().unwrap();
    let regular = dir.path().join("pokemon.json");
    let shining = dir.path().join("shining.json");
    fs::write(&regular, r#"{"pokemon": []}"#).unwrap();
    fs::write(&shining, r#"{"shining": []}"#).unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("Missingno_nft.png"), b"stale").unwrap();

    let config = write_config(dir.path());
    let output = cardsmith()
        .current_dir(dir.path())
        .args(["generate", "--offline", "--clear", "--config"])
        .arg(&config)
        .arg("--roster")
        .arg(&regular)
        .arg("--shining-roster")
        .arg(&shining)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    assert!(!out.join("Missingno_nft.png").exists());
    for sub in ["out", "out/shiny", "meta", "meta/shiny"] {
        let files: Vec<_> = fs::read_dir(dir.path().join(sub))
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .collect();
        assert!(files.is_empty(), "{} should hold no files", sub);
    }
}

#[test]
fn test_metadata_command_writes_documents_only() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let output = cardsmith()
        .current_dir(dir.path())
        .args(["metadata", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success(), "metadata failed: {}", String::from_utf8_lossy(&output.stderr));

    let json = fs::read_to_string(dir.path().join("meta/Gengar_metadata.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(doc["name"], "Gengar Card");
    assert_eq!(doc["attributes"].as_array().unwrap().len(), 5 + 2 * 3);
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_card_command_from_stdin() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let mut child = cardsmith()
        .current_dir(dir.path())
        .args(["card", "--seed", "3", "--config"])
        .arg(&config)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"Glaceon\nplasma\nice\n55\n50\n65\n4\n2\nTackle\n40\nBite\n60\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "card failed: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Invalid type!"));
    assert!(stdout.contains("Please enter either 2 or 3"));
    assert_eq!(image_dimensions(&dir.path().join("out/Glaceon_nft.png")), (300, 450));
}

#[test]
fn test_card_command_truncated_input() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let mut child = cardsmith()
        .current_dir(dir.path())
        .args(["card", "--config"])
        .arg(&config)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"Glaceon\nice\n").unwrap();
    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unknown_roster_choice_is_usage_error() {
    let output = cardsmith().args(["generate", "--only", "legendary"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_roster_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let output = cardsmith()
        .current_dir(dir.path())
        .args(["generate", "--offline", "--config"])
        .arg(&config)
        .arg("--roster")
        .arg(dir.path().join("absent.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.json"));
}
