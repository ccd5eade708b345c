//! End-to-end smoke tests driving the takmark binary on real input files

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_takmark(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_takmark"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run takmark")
}

fn logged(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

#[test]
fn test_csv_conversion_writes_package() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = dir.path().join("schrony.csv");
    fs::write(
        &csv_path,
        "Rodzaj obi,x,y,Adres\n\
         [1] - (S) - schron,18.5,54.4,ul. Polna 1\n\
         [2] - (U) - ukrycie,18.6,54.5,ul. Lesna 2\n",
    )
    .expect("Failed to write CSV fixture");

    let output = run_takmark(
        dir.path(),
        &["--schrony", csv_path.to_str().unwrap(), "-o", "schrony"],
    );
    assert!(output.status.success(), "takmark failed: {}", logged(&output));

    // the package plus the staging tree left behind for inspection
    let data = fs::read(dir.path().join("schrony.zip")).expect("Package ZIP missing");
    assert_eq!(&data[0..2], b"PK");
    let manifest = dir.path().join("out").join("MANIFEST").join("manifest.xml");
    assert!(manifest.is_file());
}

#[test]
fn test_empty_csv_writes_no_package() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let csv_path = dir.path().join("pusty.csv");
    fs::write(&csv_path, "Rodzaj obi,x,y,Adres\n").expect("Failed to write CSV fixture");

    let output = run_takmark(
        dir.path(),
        &["--schrony", csv_path.to_str().unwrap(), "-o", "pusty"],
    );

    // zero markers: explicit diagnostic, successful exit, nothing written
    assert!(output.status.success(), "takmark failed: {}", logged(&output));
    assert!(logged(&output).contains("No markers extracted"));
    assert!(!dir.path().join("pusty.zip").exists());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_empty_kml_writes_no_package() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let kml_path = dir.path().join("pusty.kml");
    fs::write(
        &kml_path,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>pusty</name>
  </Document>
</kml>"#,
    )
    .expect("Failed to write KML fixture");

    let output = run_takmark(
        dir.path(),
        &["--kml", kml_path.to_str().unwrap(), "-o", "pusty"],
    );

    assert!(output.status.success(), "takmark failed: {}", logged(&output));
    assert!(logged(&output).contains("No markers extracted"));
    assert!(!dir.path().join("pusty.zip").exists());
    assert!(!dir.path().join("out").exists());
}
