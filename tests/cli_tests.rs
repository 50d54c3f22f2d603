// CLI tests: generate → analyze → compare through the binary

use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn generate(dir: &Path, kind: &str, n: usize, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("generate")
        .arg(kind)
        .arg("--n")
        .arg(n.to_string())
        .arg("--seed")
        .arg("7")
        .arg("--output")
        .arg(&path);
    cmd.assert().success();
    path
}

fn analyze_to_json(input: &Path, report: &Path, extra: &[&str]) {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("analyze")
        .arg("--file")
        .arg(input)
        .arg("--preset")
        .arg("quick")
        .arg("--report-json")
        .arg(report)
        .args(extra);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("[json] written:"));
}

// ============================================================================
// generate
// ============================================================================

#[test]
fn test_generate_ramp_to_stdout() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("generate").arg("ramp").arg("--n").arg("12");
    cmd.assert().success().stdout("012345678901");
}

#[test]
fn test_generate_large_alphabet_writes_lines() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("generate")
        .arg("uniform")
        .arg("--n")
        .arg("5")
        .arg("--alphabet")
        .arg("90");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let values: Vec<u32> = stdout.lines().map(|l| l.parse().unwrap()).collect();
    assert_eq!(values.len(), 5);
    assert!(values.iter().all(|&v| v < 90));
}

#[test]
fn test_generate_is_deterministic_per_seed() {
    let tmp_dir = TempDir::new().unwrap();
    let a = generate(tmp_dir.path(), "uniform", 1000, "a.txt");
    let b = generate(tmp_dir.path(), "uniform", 1000, "b.txt");
    assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
}

// ============================================================================
// analyze
// ============================================================================

#[test]
fn test_analyze_text_report() {
    let tmp_dir = TempDir::new().unwrap();
    let input = generate(tmp_dir.path(), "ramp", 3000, "ramp.txt");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("analyze").arg("--file").arg(&input).arg("--preset").arg("quick");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("digits mode, N=3000, M=10"))
        .stdout(predicate::str::contains("Chi-square: 0.0000"))
        .stdout(predicate::str::contains("SchurProbe (R=1000, uniform null)"));
}

#[test]
fn test_analyze_json_to_stdout() {
    let tmp_dir = TempDir::new().unwrap();
    let input = generate(tmp_dir.path(), "lcg", 2000, "lcg.txt");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("analyze")
        .arg("--file")
        .arg(&input)
        .arg("--format")
        .arg("json")
        .arg("--lags")
        .arg("1,4")
        .arg("--no-parallel");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["n"], 2000);
    assert_eq!(json["alphabet"], 10);
    assert_eq!(json["autocorr"]["lags"].as_array().unwrap().len(), 2);
}

#[test]
fn test_analyze_limit_truncates() {
    let tmp_dir = TempDir::new().unwrap();
    let input = generate(tmp_dir.path(), "uniform", 5000, "u.txt");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("analyze")
        .arg("--file")
        .arg(&input)
        .arg("--n")
        .arg("500")
        .arg("--preset")
        .arg("quick");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("N=500"));
}

#[test]
fn test_analyze_integer_mode() {
    let tmp_dir = TempDir::new().unwrap();
    let input = tmp_dir.path().join("draws.txt");
    std::fs::write(&input, "12\n95\nnot a number\n-3\n40\n").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("analyze")
        .arg("--file")
        .arg(&input)
        .arg("--integers")
        .arg("--alphabet")
        .arg("90")
        .arg("--format")
        .arg("json");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["n"], 4);
    assert_eq!(json["alphabet"], 90);
    assert_eq!(json["max_observed"], 95);
}

#[test]
fn test_analyze_empty_input_reports_undefined() {
    let tmp_dir = TempDir::new().unwrap();
    let input = tmp_dir.path().join("empty.txt");
    std::fs::write(&input, "no digits here\n").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("analyze")
        .arg("--file")
        .arg(&input)
        .arg("--format")
        .arg("json");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["n"], 0);
    assert!(json["distribution"]["chi_square"].is_null());
    assert!(json["schur"]["z"].is_null());
}

#[test]
fn test_analyze_latin1_digits_file() {
    let tmp_dir = TempDir::new().unwrap();
    let input = tmp_dir.path().join("pi_latin1.html");
    std::fs::write(&input, b"<p>\xE9</p>3.14159265\xA0358979").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("analyze")
        .arg("--file")
        .arg(&input)
        .arg("--format")
        .arg("json");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["n"], 15);
}

#[test]
fn test_analyze_missing_file_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("analyze").arg("--file").arg("/nonexistent/digits.txt");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read digits"));
}

#[test]
fn test_analyze_rejects_bad_ngram_order() {
    let tmp_dir = TempDir::new().unwrap();
    let input = generate(tmp_dir.path(), "ramp", 100, "r.txt");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("analyze")
        .arg("--file")
        .arg(&input)
        .arg("--orders")
        .arg("1,9");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_analyze_rejects_excessive_workers() {
    let tmp_dir = TempDir::new().unwrap();
    let input = generate(tmp_dir.path(), "uniform", 2000, "u.txt");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("analyze")
        .arg("--file")
        .arg(&input)
        .arg("--workers")
        .arg("1000000");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_analyze_with_config_file() {
    let tmp_dir = TempDir::new().unwrap();
    let input = generate(tmp_dir.path(), "ramp", 2000, "r.txt");
    let config = tmp_dir.path().join("probe.toml");
    std::fs::write(&config, "schur_window = 300\nschur_null = \"empirical\"\n").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("analyze").arg("--file").arg(&input).arg("--config").arg(&config);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SchurProbe (R=300, empirical null)"));
}

// ============================================================================
// compare
// ============================================================================

#[test]
fn test_compare_against_baseline_with_exports() {
    let tmp_dir = TempDir::new().unwrap();
    let dir = tmp_dir.path();

    let uniform = generate(dir, "uniform", 5000, "uniform.txt");
    let ramp = generate(dir, "ramp", 5000, "ramp.txt");
    let uniform_json = dir.join("uniform.json");
    let ramp_json = dir.join("ramp.json");
    analyze_to_json(&uniform, &uniform_json, &[]);
    analyze_to_json(&ramp, &ramp_json, &[]);

    let csv = dir.join("cmp.csv");
    let md = dir.join("cmp.md");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("compare")
        .arg(&uniform_json)
        .arg(&ramp_json)
        .arg("--baseline")
        .arg(&uniform_json)
        .arg("--csv")
        .arg(&csv)
        .arg("--md")
        .arg(&md);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("=== COMPARISON (normalized policy"))
        .stdout(predicate::str::contains("[baseline]"))
        .stderr(predicate::str::contains("[csv] written:"))
        .stderr(predicate::str::contains("[md] written:"));

    let csv_text = std::fs::read_to_string(&csv).unwrap();
    let mut lines = csv_text.lines();
    assert!(lines.next().unwrap().starts_with("file,N,severity,score"));
    // most anomalous first
    assert!(lines.next().unwrap().starts_with("ramp.json,5000,red,"));

    let md_text = std::fs::read_to_string(&md).unwrap();
    assert!(md_text.starts_with("# Digit-Probe Compare"));
    assert!(md_text.contains("**Baseline:** `uniform.json`"));
}

#[test]
fn test_compare_json_weighted_policy() {
    let tmp_dir = TempDir::new().unwrap();
    let dir = tmp_dir.path();
    let ramp = generate(dir, "ramp", 2000, "ramp.txt");
    let ramp_json = dir.join("ramp.json");
    analyze_to_json(&ramp, &ramp_json, &[]);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("compare")
        .arg(&ramp_json)
        .arg("--policy")
        .arg("weighted")
        .arg("--format")
        .arg("json");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["policy"], "weighted");
    assert!(json["baseline"].is_null());
    assert_eq!(json["rows"][0]["label"], "ramp.json");
    assert_eq!(json["rows"][0]["severity"], "red");
}

#[test]
fn test_compare_rejects_mixed_schur_nulls() {
    let tmp_dir = TempDir::new().unwrap();
    let dir = tmp_dir.path();
    let input = generate(dir, "uniform", 2000, "u.txt");
    let a = dir.join("a.json");
    let b = dir.join("b.json");
    analyze_to_json(&input, &a, &[]);
    analyze_to_json(&input, &b, &["--schur-null", "empirical"]);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("compare").arg(&a).arg(&b);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Incompatible baseline"));
}

#[test]
fn test_compare_malformed_report_fails() {
    let tmp_dir = TempDir::new().unwrap();
    let bogus = tmp_dir.path().join("bogus.json");
    std::fs::write(&bogus, "{\"n\": \"many\"}").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("digit-probe");
    cmd.arg("compare").arg(&bogus);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load report"));
}
