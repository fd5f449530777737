// tests/cli_test.rs
//
// Drives the sirencheckr binary: generate -> learn -> detect

mod test_utils;

use test_utils::*;

#[test]
fn generate_learn_detect_round() {
    let dir = TempDir::new();
    let siren = dir.join("siren.wav");
    let signature = dir.join("signature.json");

    let output = run_sirencheckr()
        .args(["generate", siren.to_str().unwrap(), "--seconds", "6"])
        .output()
        .expect("Failed to run generate");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(siren.exists());

    let output = run_sirencheckr()
        .args(["learn", siren.to_str().unwrap(), "-o", signature.to_str().unwrap()])
        .output()
        .expect("Failed to run learn");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&signature).unwrap()).unwrap();
    assert!(stored["harmonicRatios"].is_array());
    assert!(stored["timestamp"].is_string());

    let output = run_sirencheckr()
        .args([
            "detect",
            dir.path().to_str().unwrap(),
            "-s",
            signature.to_str().unwrap(),
            "--json",
        ])
        .output()
        .expect("Failed to run detect");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["verdict"], "detected");
}

#[test]
fn detect_without_signature_fails() {
    let dir = TempDir::new();
    let siren = dir.join("siren.wav");
    write_tone(&siren, 1000.0, &SIREN_RATIOS, 1.0, 44100);

    let output = run_sirencheckr()
        .args([
            "detect",
            siren.to_str().unwrap(),
            "-s",
            dir.join("missing.json").to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run detect");
    assert!(!output.status.success());
}

#[test]
fn learning_from_silence_fails() {
    let dir = TempDir::new();
    let quiet = dir.join("quiet.wav");
    write_silence(&quiet, 6.0, 44100);

    let output = run_sirencheckr()
        .args([
            "learn",
            quiet.to_str().unwrap(),
            "-o",
            dir.join("sig.json").to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run learn");
    assert!(!output.status.success());
    assert!(!dir.join("sig.json").exists());
}

#[test]
fn mismatched_settings_are_reported_once_per_run() {
    let dir = TempDir::new();
    let siren = dir.join("siren.wav");
    let signature = dir.join("signature.json");
    write_tone(&siren, 1000.0, &SIREN_RATIOS, 6.0, 44100);
    write_tone(&dir.join("second.wav"), 1000.0, &SIREN_RATIOS, 1.0, 44100);

    let output = run_sirencheckr()
        .args(["learn", siren.to_str().unwrap(), "-o", signature.to_str().unwrap()])
        .output()
        .expect("Failed to run learn");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let config = dir.join("narrow.json");
    std::fs::write(&config, r#"{ "maxFrequency": 2500 }"#).unwrap();

    let output = run_sirencheckr()
        .env_remove("RUST_LOG")
        .args([
            "--config",
            config.to_str().unwrap(),
            "detect",
            dir.path().to_str().unwrap(),
            "-s",
            signature.to_str().unwrap(),
            "--json",
        ])
        .output()
        .expect("Failed to run detect");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("different analysis settings").count(), 1, "{}", stderr);
}

#[test]
fn out_of_range_tolerance_in_config_fails() {
    let dir = TempDir::new();
    let config = dir.join("loose.json");
    std::fs::write(&config, r#"{ "tolerance": 100 }"#).unwrap();

    let output = run_sirencheckr()
        .args(["--config", config.to_str().unwrap(), "presets"])
        .output()
        .expect("Failed to run presets");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("tolerance"));
}
