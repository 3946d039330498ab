#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn cdf(n: u64, c: f64) -> Value {
    json!({
        "sample_count": n,
        "centrality": c,
        "spread": c / 10.0,
        "percentiles": [{"p": 0.5, "value": c}, {"p": 0.9, "value": c * 1.5}],
        "range_low": c / 2.0,
        "range_high": c * 2.0
    })
}

fn run_json(tag: &str, version: &str, scale: f64) -> Value {
    let machperf: serde_json::Map<String, Value> = [
        ("cpu_process", 12.0),
        ("cpu_gc", 2.0),
        ("cpu_mutator", 10.0),
        ("rss", 8000.0),
        ("heap", 7000.0),
        ("alloc_rate", 300.0),
        ("net_read", 40.0),
        ("net_write", 41.0),
        ("fs_read", 1.0),
        ("fs_write", 5.0),
        ("slot_start", 0.01),
        ("leadership", 0.02),
        ("forge", 0.1),
        ("block_gap", 20.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), cdf(100, v * scale)))
    .collect();
    let blockprop: serde_json::Map<String, Value> = [
        ("notice", 0.3),
        ("request", 0.01),
        ("fetched", 0.2),
        ("adopted", 0.05),
        ("announced", 0.01),
        ("sent", 0.02),
        ("prop_0_50", 0.8),
        ("prop_0_80", 1.1),
        ("prop_0_90", 1.3),
        ("prop_0_96", 1.6),
        ("prop_1_00", 2.4),
        ("block_size", 64000.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), cdf(50, v * scale)))
    .collect();

    json!({
        "meta": {
            "tag": tag,
            "batch": "nightly",
            "profile": "ci-bench",
            "era": "conway",
            "timestamp": "2023-11-14T22:13:20Z",
            "manifest": {
                "name": "cardano-node",
                "branch": "master",
                "revision": "0123abcdef",
                "version": version
            },
            "generator": {
                "tps": 12.0,
                "tx_count": 10000,
                "inputs_per_tx": 2,
                "outputs_per_tx": 2
            }
        },
        "summary": {
            "hosts": 52,
            "log_objects": 1234567,
            "slots": 3600,
            "blocks_forged": 180,
            "tx_submitted": 10000,
            "duration_s": 3600.0,
            "target_tps": 12.0
        },
        "machperf": machperf,
        "blockprop": blockprop
    })
}

fn write_run(dir: &Path, tag: &str, version: &str, scale: f64) -> PathBuf {
    let path = dir.join(format!("{tag}.json"));
    fs::write(&path, serde_json::to_string_pretty(&run_json(tag, version, scale)).unwrap()).unwrap();
    path
}

fn benchreport(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("benchreport").unwrap();
    cmd.current_dir(dir).env_remove("BENCHREPORT_AUTHOR");
    cmd
}

#[test]
fn report_writes_every_format_and_table() {
    let dir = tempdir().unwrap();
    let base = write_run(dir.path(), "base", "10.2.0", 1.0);
    let prev = write_run(dir.path(), "prev", "10.1.1", 1.2);
    let out = dir.path().join("out");

    benchreport(dir.path())
        .arg("report")
        .arg("--base")
        .arg(&base)
        .arg("--compare")
        .arg(&prev)
        .arg("--output-dir")
        .arg(&out)
        .arg("--author")
        .arg("perf-team")
        .assert()
        .success()
        .stderr(predicate::str::contains("wrote"));

    for name in ["report-value-only.org", "report-value-only.tex", "report-value-only.txt"] {
        assert!(out.join(name).is_file(), "{name} missing");
    }
    for name in ["summary.org", "resources.tex", "endtoend.txt"] {
        assert!(out.join(name).is_file(), "{name} missing");
    }
    let org = fs::read_to_string(out.join("report-value-only.org")).unwrap();
    assert!(org.starts_with("#+TITLE: 10.2.0 value-only\n#+AUTHOR: perf-team\n"));
    assert!(org.contains("| Metric "));
    assert!(!out.join("report-value-only.org.context.json").exists());
}

#[test]
fn no_comparison_runs_fails_without_output() {
    let dir = tempdir().unwrap();
    let base = write_run(dir.path(), "base", "10.2.0", 1.0);
    let out = dir.path().join("out");

    benchreport(dir.path())
        .arg("report")
        .arg("--base")
        .arg(&base)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("EmptyRunSet"));

    assert!(!out.exists());
}

#[test]
fn broken_template_fails_whole_batch() {
    let dir = tempdir().unwrap();
    let base = write_run(dir.path(), "base", "10.2.0", 1.0);
    let prev = write_run(dir.path(), "prev", "10.1.1", 1.0);
    let template = dir.path().join("broken.txt");
    fs::write(&template, "{{ report.nonexistent }}").unwrap();
    let out = dir.path().join("out");

    benchreport(dir.path())
        .arg("report")
        .arg("--base")
        .arg(&base)
        .arg("--compare")
        .arg(&prev)
        .arg("--format")
        .arg("org,text")
        .arg("--template")
        .arg(format!("text={}", template.display()))
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("TemplateError"))
        .stderr(predicate::str::contains("missing variable 'report.nonexistent'"));

    assert!(!out.join("report-value-only.org").exists());
}

#[test]
fn config_selects_formats_and_author() {
    let dir = tempdir().unwrap();
    let base = write_run(dir.path(), "base", "10.2.0", 1.0);
    let prev = write_run(dir.path(), "prev", "10.1.1", 1.0);
    fs::write(
        dir.path().join("benchreport.yaml"),
        "author: config-author\nformats: [text]\noutput_dir: reports\n",
    )
    .unwrap();

    benchreport(dir.path())
        .arg("report")
        .arg("--base")
        .arg(&base)
        .arg("--compare")
        .arg(&prev)
        .assert()
        .success();

    let reports = dir.path().join("reports");
    let text = fs::read_to_string(reports.join("report-value-only.txt")).unwrap();
    assert!(text.contains("by config-author,"));
    assert!(!reports.join("report-value-only.org").exists());
}

#[test]
fn author_from_environment() {
    let dir = tempdir().unwrap();
    let base = write_run(dir.path(), "base", "10.2.0", 1.0);
    let prev = write_run(dir.path(), "prev", "10.1.1", 1.0);

    benchreport(dir.path())
        .env("BENCHREPORT_AUTHOR", "env-author")
        .arg("report")
        .arg("--base")
        .arg(&base)
        .arg("--compare")
        .arg(&prev)
        .arg("--format")
        .arg("text")
        .assert()
        .success();

    let text = fs::read_to_string(dir.path().join("report-value-only.txt")).unwrap();
    assert!(text.contains("by env-author,"));
}

#[test]
fn unknown_config_key_is_a_config_error() {
    let dir = tempdir().unwrap();
    let base = write_run(dir.path(), "base", "10.2.0", 1.0);
    let prev = write_run(dir.path(), "prev", "10.1.1", 1.0);
    let config = dir.path().join("custom.yaml");
    fs::write(&config, "formatz: [org]\n").unwrap();

    benchreport(dir.path())
        .arg("report")
        .arg("--base")
        .arg(&base)
        .arg("--compare")
        .arg(&prev)
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn emit_context_writes_diagnostics() {
    let dir = tempdir().unwrap();
    let base = write_run(dir.path(), "base", "10.2.0", 1.0);
    let prev = write_run(dir.path(), "prev", "10.1.1", 1.0);

    benchreport(dir.path())
        .arg("report")
        .arg("--base")
        .arg(&base)
        .arg("--compare")
        .arg(&prev)
        .arg("--format")
        .arg("latex")
        .arg("--date")
        .arg("2024-01-02T03:04:05Z")
        .arg("--emit-context")
        .assert()
        .success();

    let raw = fs::read_to_string(dir.path().join("report-value-only.tex.context.json")).unwrap();
    let context: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(context["report"]["date"], "2024-01-02T03:04:05Z");
    assert_eq!(context["report"]["tag"], "base-vs-prev");
    assert_eq!(context["format"], "latex");
    assert_eq!(context["runs"][0]["tag"], "prev");

    let template = fs::read_to_string(dir.path().join("report-value-only.tex.template")).unwrap();
    assert!(template.starts_with("\\documentclass"));
}

#[test]
fn failed_write_leaves_no_partial_output() {
    let dir = tempdir().unwrap();
    let base = write_run(dir.path(), "base", "10.2.0", 1.0);
    let prev = write_run(dir.path(), "prev", "10.1.1", 1.0);
    let out = dir.path().join("out");
    // A directory squatting on the text report's name blocks the last move.
    fs::create_dir_all(out.join("report-value-only.txt").join("keep")).unwrap();

    benchreport(dir.path())
        .arg("report")
        .arg("--base")
        .arg(&base)
        .arg("--compare")
        .arg(&prev)
        .arg("--format")
        .arg("org,text")
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to write output"));

    let mut left: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    left.sort();
    assert_eq!(left, vec!["report-value-only.txt"]);
}

#[test]
fn invalid_run_file_is_a_config_error() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("base.json");
    let mut value = run_json("base", "10.2.0", 1.0);
    value["machperf"]["rss"]["centrality"] = json!(1.0e9);
    fs::write(&base, value.to_string()).unwrap();
    let prev = write_run(dir.path(), "prev", "10.1.1", 1.0);

    benchreport(dir.path())
        .arg("report")
        .arg("--base")
        .arg(&base)
        .arg("--compare")
        .arg(&prev)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to parse run"));
}

#[test]
fn merge_adds_sample_counts() {
    let dir = tempdir().unwrap();
    let a = write_run(dir.path(), "a", "10.2.0", 1.0);
    let b = write_run(dir.path(), "b", "10.2.0", 3.0);

    let output = benchreport(dir.path())
        .arg("merge")
        .arg(&a)
        .arg(&b)
        .output()
        .unwrap();
    assert!(output.status.success());

    let merged: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(merged["rss"]["sample_count"], 200);
    assert_eq!(merged["rss"]["centrality"], 16000.0);
    assert_eq!(merged["rss"]["range_low"], 4000.0);
    assert_eq!(merged["rss"]["range_high"], 48000.0);
}

#[test]
fn merge_rejects_mismatched_grids() {
    let dir = tempdir().unwrap();
    let a = write_run(dir.path(), "a", "10.2.0", 1.0);
    let b = dir.path().join("b.json");
    let mut value = run_json("b", "10.2.0", 1.0);
    value["blockprop"]["notice"]["percentiles"][1]["p"] = json!(0.95);
    fs::write(&b, value.to_string()).unwrap();

    benchreport(dir.path())
        .arg("merge")
        .arg("--table")
        .arg("blockprop")
        .arg(&a)
        .arg(&b)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("IncompatibleDistributions"))
        .stderr(predicate::str::contains("notice"));
}
