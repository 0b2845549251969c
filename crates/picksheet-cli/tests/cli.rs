//! Integration tests for the picksheet binary.
//!
//! Inputs are plain-text page dumps (form feed between pages), so no PDF
//! fixtures are needed. Every test points `--config` at a temp file to stay
//! independent of the user's configuration.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BUILD_SHEET: &str = "BUILD SHEET\nOrder: SO-100  Shipment: SH123456\nShipping Method: 2 Day\nB-PG-172-BLACK\nGB-DOZ-XTREME\n\x0c\
continued\nGB-DOZ-XTREME\n\x0c\
BUILD SHEET\nOrder: USS-200  Shipment: SH777777\nCustomer Pickup\nH-USMC-ADJ\n\x0c";

const PICK_LIST: &str = "PICK LIST\nSO-300 SH300300\nA-DUO-PXG\n";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("picksheet").unwrap();
        cmd.arg("--config").arg(self.path("config.json"));
        cmd
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn process_prints_table_grouped_by_category() {
    let ws = Workspace::new();
    let input = ws.write("build.txt", BUILD_SHEET);

    ws.cmd()
        .args(["process", arg(&input)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Balls"))
        .stdout(predicate::str::contains("SO-100"))
        .stdout(predicate::str::contains("USS-200"))
        .stdout(predicate::str::contains("B-PG-172-BLACK"))
        .stdout(predicate::str::contains("2-day shipping: SH123456"))
        .stdout(predicate::str::contains("Customer pickup: USS-200"));
}

#[test]
fn process_csv_lists_sorted_relations() {
    let ws = Workspace::new();
    let input = ws.write("build.txt", BUILD_SHEET);

    let output = ws
        .cmd()
        .args(["process", arg(&input), "--format", "csv"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "order_id,code,description,shipment_id,category,appearances",
            "SO-100,B-PG-172-BLACK,Xtreme Carry Stand Bag - Freedom - Black,SH123456,Other,1",
            "SO-100,GB-DOZ-XTREME,Xtreme Golf Ball - Dozen,SH123456,Balls,2",
            "USS-200,H-USMC-ADJ,PXG USMC Unstructured Hat - Adjustable,SH777777,Caps,1",
        ]
    );
}

#[test]
fn process_category_filter() {
    let ws = Workspace::new();
    let input = ws.write("build.txt", BUILD_SHEET);

    ws.cmd()
        .args(["process", arg(&input), "--format", "csv", "--category", "caps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("H-USMC-ADJ"))
        .stdout(predicate::str::contains("GB-DOZ-XTREME").not());
}

#[test]
fn process_merges_pick_list_into_json() {
    let ws = Workspace::new();
    let build = ws.write("build.txt", BUILD_SHEET);
    let pick = ws.write("pick.txt", PICK_LIST);
    let out = ws.path("scan.json");

    ws.cmd()
        .args([
            "process",
            arg(&build),
            "--pick-list",
            arg(&pick),
            "--format",
            "json",
            "--output",
            arg(&out),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["relations"].as_array().unwrap().len(), 4);
    assert_eq!(json["orders"].as_array().unwrap().len(), 3);
    assert_eq!(json["appearances"]["GB-DOZ-XTREME"], 2);
    assert_eq!(json["two_day_shipments"], serde_json::json!(["SH123456"]));
    assert_eq!(json["pickup_orders"], serde_json::json!(["USS-200"]));
}

#[test]
fn process_writes_pdf_report() {
    let ws = Workspace::new();
    let input = ws.write("build.txt", BUILD_SHEET);
    let report = ws.path("report.pdf");

    ws.cmd()
        .args(["process", arg(&input), "--report", arg(&report)])
        .assert()
        .success()
        .stderr(predicate::str::contains("Report written to"));

    let bytes = fs::read(&report).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn process_reports_empty_input() {
    let ws = Workspace::new();
    let input = ws.write("empty.txt", "nothing to see\x0cstill nothing");

    ws.cmd()
        .args(["process", arg(&input)])
        .assert()
        .success()
        .stderr(predicate::str::contains("No orders or part codes were found"));
}

#[test]
fn process_rejects_unknown_extension() {
    let ws = Workspace::new();
    let input = ws.write("build.docx", BUILD_SHEET);

    ws.cmd()
        .args(["process", arg(&input)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format: docx"));
}

#[test]
fn process_rejects_missing_file() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["process", arg(&ws.path("missing.pdf"))])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn process_rejects_invalid_pdf() {
    let ws = Workspace::new();
    let input = ws.write("broken.pdf", "this is not a pdf");

    ws.cmd()
        .args(["process", arg(&input)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn process_uses_external_catalog() {
    let ws = Workspace::new();
    let catalog = ws.write("catalog.csv", "code,description\nWIDGET-1,Blue widget\n");
    let input = ws.write("build.txt", "SO-1 SH100000 WIDGET-1 GB-DOZ-XTREME");

    ws.cmd()
        .args(["process", arg(&input), "--catalog", arg(&catalog), "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SO-1,WIDGET-1,Blue widget,SH100000,Other,1"))
        .stdout(predicate::str::contains("GB-DOZ-XTREME").not());
}

#[test]
fn catalog_classify_known_code() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["catalog", "classify", "GB-DOZ-XTREME"])
        .assert()
        .success()
        .stdout(predicate::str::diff("Balls\n"));
}

#[test]
fn catalog_list_filters_by_category() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["catalog", "list", "--category", "gloves"])
        .assert()
        .success()
        .stdout(predicate::str::contains("G4-65201011HML-BLK"))
        .stdout(predicate::str::contains("B-PG-172").not());
}

#[test]
fn catalog_validate_reports_duplicates() {
    let ws = Workspace::new();
    let catalog = ws.write(
        "catalog.csv",
        "code,description\nB-1,First\nb-1,Second\n,Orphan\nB-2,Other\n",
    );

    ws.cmd()
        .args(["catalog", "validate", arg(&catalog)])
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate code b-1: kept 'First', ignored 'Second'"))
        .stdout(predicate::str::contains("2 entries, 2 warnings"));
}

#[test]
fn config_set_then_get() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["config", "set", "extraction.shadowing", "overlap"])
        .assert()
        .success();

    ws.cmd()
        .args(["config", "get", "extraction.shadowing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"overlap\""));

    ws.cmd()
        .args(["config", "set", "report.fill_threshold", "oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for report.fill_threshold"));

    ws.cmd()
        .args(["config", "set", "report.fill_threshold", "2000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must lie inside the page height"));
}
