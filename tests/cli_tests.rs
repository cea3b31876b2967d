//! CLI integration tests for the `craft` binary.
//!
//! Each test runs the built binary in a fresh temp directory with an isolated
//! XDG config home, so no stray craft.toml is picked up.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

/// Run craft with the given arguments and return (stdout, stderr, exit code).
fn run_craft(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_craft"))
        .args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir)
        .output()
        .expect("Failed to execute craft");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code().unwrap_or(-1))
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("fixture path is UTF-8")
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_fixtures() {
    let temp = TempDir::new().unwrap();
    let basic = fixture("basic.recipes");
    let tools = fixture("tools.jsonl");
    let (stdout, _, code) = run_craft(temp.path(), &["check", path_str(&basic), path_str(&tools)]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Loaded 6 recipe(s) from 2 file(s) on a 3x3 grid"), "{}", stdout);
}

#[test]
fn test_check_json() {
    let temp = TempDir::new().unwrap();
    let basic = fixture("basic.recipes");
    let (stdout, _, code) = run_craft(temp.path(), &["check", path_str(&basic), "--json"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["recipes"], 4);
    assert_eq!(json["skipped"], 0);
    assert_eq!(json["grid"], "3x3");
}

#[test]
fn test_check_directory() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("recipes");
    fs::create_dir_all(&dir).unwrap();
    fs::copy(fixture("basic.recipes"), dir.join("basic.recipes")).unwrap();
    fs::copy(fixture("tools.jsonl"), dir.join("tools.jsonl")).unwrap();

    let (stdout, _, code) = run_craft(temp.path(), &["check", "recipes"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Loaded 6 recipe(s)"));
}

#[test]
fn test_check_duplicate_fails() {
    let temp = TempDir::new().unwrap();
    let duplicate = fixture("duplicate.recipes");
    let (_, stderr, code) = run_craft(temp.path(), &["check", path_str(&duplicate)]);
    assert_eq!(code, 1);
    assert!(stderr.contains("line 6"), "{}", stderr);
    assert!(stderr.contains("duplicates"), "{}", stderr);
}

#[test]
fn test_check_lenient_vs_strict() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("broken.recipes");
    fs::write(&file, "torch 4\n- coal -\n- stick -\n\nplanks 4\n- - -\n- - -\nlog - -\n").unwrap();

    let (stdout, stderr, code) = run_craft(temp.path(), &["check", "broken.recipes"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Loaded 1 recipe(s)"));
    assert!(stdout.contains("Skipped 1 malformed record(s)"));
    assert!(stderr.contains("broken.recipes:2"), "{}", stderr);

    let (_, _, code) = run_craft(temp.path(), &["check", "broken.recipes", "--strict"]);
    assert_eq!(code, 1);
}

#[test]
fn test_check_no_files() {
    let temp = TempDir::new().unwrap();
    let (_, stderr, code) = run_craft(temp.path(), &["check", "."]);
    assert_eq!(code, 2);
    assert!(stderr.contains("No recipe files found"));
}

// ============================================================================
// lookup / query
// ============================================================================

#[test]
fn test_lookup_shifted_torch() {
    let temp = TempDir::new().unwrap();
    let basic = fixture("basic.recipes");
    let (stdout, _, code) = run_craft(
        temp.path(),
        &["lookup", "-r", path_str(&basic), "--row", "- - coal", "--row", "- - stick", "--row", "- - -"],
    );
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "torch x4");
}

#[test]
fn test_lookup_json() {
    let temp = TempDir::new().unwrap();
    let basic = fixture("basic.recipes");
    let (stdout, _, code) = run_craft(
        temp.path(),
        &["lookup", "-r", path_str(&basic), "--row", "- - -", "--row", "- log -", "--row", "- - -", "--json"],
    );
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["output"]["name"], "planks");
    assert_eq!(json["output"]["quantity"], 4);
}

#[test]
fn test_lookup_no_match() {
    let temp = TempDir::new().unwrap();
    let basic = fixture("basic.recipes");
    let (stdout, _, code) = run_craft(
        temp.path(),
        &["lookup", "-r", path_str(&basic), "--row", "- - -", "--row", "- - -", "--row", "coal stick -"],
    );
    assert_eq!(code, 1);
    assert_eq!(stdout.trim(), "no match");
}

#[test]
fn test_lookup_bad_row_width() {
    let temp = TempDir::new().unwrap();
    let basic = fixture("basic.recipes");
    let (_, stderr, code) = run_craft(
        temp.path(),
        &["lookup", "-r", path_str(&basic), "--row", "- -", "--row", "- - -", "--row", "- - -"],
    );
    assert_eq!(code, 2);
    assert!(stderr.contains("expected 3 cells"));
}

#[test]
fn test_query_layouts() {
    let temp = TempDir::new().unwrap();
    let layouts = fixture("layouts.txt");
    let basic = fixture("basic.recipes");
    let tools = fixture("tools.jsonl");
    let (stdout, _, code) = run_craft(
        temp.path(),
        &["query", path_str(&layouts), "-r", path_str(&basic), path_str(&tools)],
    );
    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "torch_right: torch x4",
            "torch_sideways: no match",
            "shovel_left: wooden_shovel x1",
            "empty: no match",
        ]
    );
}

#[test]
fn test_query_json() {
    let temp = TempDir::new().unwrap();
    let layouts = fixture("layouts.txt");
    let basic = fixture("basic.recipes");
    let (stdout, _, code) =
        run_craft(temp.path(), &["query", path_str(&layouts), "-r", path_str(&basic), "--json"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let results = json["results"].as_array().expect("results array");
    assert_eq!(results.len(), 4);
    assert_eq!(results[0]["output"]["name"], "torch");
    assert!(results[2]["output"].is_null(), "shovel is not in basic.recipes");
}

// ============================================================================
// variants
// ============================================================================

#[test]
fn test_variants_center_cell() {
    let temp = TempDir::new().unwrap();
    let (stdout, _, code) =
        run_craft(temp.path(), &["variants", "--row", "- - -", "--row", "- x -", "--row", "- - -"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Margins: top 1, left 1, right 1, bottom 1"));
    assert!(stdout.contains("9 variant(s):"));
}

#[test]
fn test_variants_empty_layout() {
    let temp = TempDir::new().unwrap();
    let (_, stderr, code) =
        run_craft(temp.path(), &["variants", "--row", "- - -", "--row", "- - -", "--row", "- - -"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("no items"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_grid_and_empty_token() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("craft.toml"), "[grid]\nwidth = 2\nheight = 2\n\n[import]\nempty = \".\"\n")
        .unwrap();
    fs::write(temp.path().join("small.recipes"), "planks 4\n. .\nlog .\n").unwrap();

    let (stdout, _, code) =
        run_craft(temp.path(), &["lookup", "-r", "small.recipes", "--row", ". log", "--row", ". ."]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "planks x4");
}

#[test]
fn test_cli_overrides_config() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("craft.toml"), "[grid]\nwidth = 2\nheight = 2\n").unwrap();
    let (stdout, _, code) = run_craft(
        temp.path(),
        &["variants", "--width", "1", "--height", "3", "--row", "a", "--row", "-", "--row", "-"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("3 variant(s):"));
}

#[test]
fn test_invalid_config() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("craft.toml"), "[grid]\nwidth = 0\n").unwrap();
    let (_, stderr, code) = run_craft(temp.path(), &["variants", "--row", "a"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("grid.width"));
}

#[test]
fn test_errors_collected_to_jsonl() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("craft.toml"),
        "[telemetry]\ncollect_errors = true\npath = \"logs/errors.jsonl\"\n",
    )
    .unwrap();
    let duplicate = fixture("duplicate.recipes");
    let (_, _, code) = run_craft(temp.path(), &["check", path_str(&duplicate)]);
    assert_eq!(code, 1);

    let log = fs::read_to_string(temp.path().join("logs").join("errors.jsonl")).unwrap();
    let entry: serde_json::Value = serde_json::from_str(log.trim()).expect("valid JSONL entry");
    assert_eq!(entry["command"], "check");
    assert_eq!(entry["error_type"], "duplicate_recipe");
    assert_eq!(entry["line"], 6);
}
