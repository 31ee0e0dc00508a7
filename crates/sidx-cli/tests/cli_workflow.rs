#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SAMPLE_JS: &str = concat!(
    "var documenterSearchIndex = {\"docs\":\n",
    "[{\"location\":\"\",\"page\":\"Home\",\"title\":\"Home\",",
    "\"text\":\"Whitened RBM documentation.\",\"category\":\"page\"},\n",
    "{\"location\":\"guide/\",\"page\":\"Guide\",\"title\":\"Guide\",",
    "\"text\":\"Centering transforms the gradient.\",\"category\":\"page\"},\n",
    "{\"location\":\"guide/#Training\",\"page\":\"Guide\",\"title\":\"Training\",",
    "\"text\":\"\",\"category\":\"section\"}]\n",
    "}\n",
);

fn sidx_cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sidx"));
    cmd.env("SIDX_DATA_DIR", data_dir);
    cmd.env("SIDX_CONFIG_DIR", data_dir);
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn build_then_validate_round_trip() {
    let tmp = tempdir().unwrap();
    let docs = tmp.path().join("docs");
    fs::create_dir_all(docs.join("guide")).unwrap();
    fs::write(
        docs.join("index.md"),
        "# Home\n\nWhitened restricted Boltzmann machines.\n",
    )
    .unwrap();
    fs::write(
        docs.join("guide").join("training.md"),
        "# Training\n\nCentering transforms the gradient.\n\n## Tips\n\nUse small rates.\n",
    )
    .unwrap();

    let output = tmp.path().join("search_index.js");
    sidx_cmd(tmp.path())
        .args(["build", docs.to_str().unwrap()])
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Built"));

    let js = fs::read_to_string(&output).unwrap();
    assert!(js.starts_with("var documenterSearchIndex = {\"docs\":"));

    sidx_cmd(tmp.path())
        .args(["validate", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("info:"));
}

#[test]
fn build_output_is_deterministic() {
    let tmp = tempdir().unwrap();
    let docs = tmp.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("a.md"), "# Alpha\n\nFirst page.\n").unwrap();
    fs::write(docs.join("b.md"), "# Beta\n\nSecond page.\n").unwrap();

    let first = tmp.path().join("one.js");
    let second = tmp.path().join("two.js");
    for out in [&first, &second] {
        sidx_cmd(tmp.path())
            .args(["--quiet", "build", docs.to_str().unwrap()])
            .arg("--output")
            .arg(out)
            .assert()
            .success();
    }

    assert_eq!(
        fs::read_to_string(&first).unwrap(),
        fs::read_to_string(&second).unwrap(),
    );
}

#[test]
fn add_search_list_remove_from_local_file() {
    let tmp = tempdir().unwrap();
    let index_path = tmp.path().join("search_index.js");
    fs::write(&index_path, SAMPLE_JS).unwrap();

    sidx_cmd(tmp.path())
        .args(["add", "rbm", index_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added"));

    let out = sidx_cmd(tmp.path())
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let sources: Value = serde_json::from_slice(&out).unwrap();
    let rows = sources.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["alias"], "rbm");
    assert_eq!(rows[0]["records"], 3);

    let out = sidx_cmd(tmp.path())
        .args(["search", "centering", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let hits: Value = serde_json::from_slice(&out).unwrap();
    let hits = hits.as_array().unwrap();
    assert!(!hits.is_empty());
    assert_eq!(hits[0]["location"], "guide/");
    assert_eq!(hits[0]["source"], "rbm");

    // Category filter narrows to section records.
    let out = sidx_cmd(tmp.path())
        .args([
            "search", "training", "--category", "section", "--format", "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let hits: Value = serde_json::from_slice(&out).unwrap();
    assert!(
        hits.as_array()
            .unwrap()
            .iter()
            .all(|h| h["category"] == "section")
    );

    sidx_cmd(tmp.path())
        .args(["remove", "rbm"])
        .assert()
        .success();

    sidx_cmd(tmp.path())
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn zero_limit_search_reports_no_results() {
    let tmp = tempdir().unwrap();
    let index_path = tmp.path().join("search_index.js");
    fs::write(&index_path, SAMPLE_JS).unwrap();

    sidx_cmd(tmp.path())
        .args(["add", "rbm", index_path.to_str().unwrap()])
        .assert()
        .success();

    sidx_cmd(tmp.path())
        .args(["search", "centering", "-n", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results."));
}

#[test]
fn add_rejects_structurally_broken_index() {
    let tmp = tempdir().unwrap();
    let index_path = tmp.path().join("broken.js");
    fs::write(
        &index_path,
        "var documenterSearchIndex = {\"docs\":[{\"location\":\"guide/\",\"page\":\"\",\"title\":\"P\",\"text\":\"x\",\"category\":\"page\"}]}\n",
    )
    .unwrap();

    sidx_cmd(tmp.path())
        .args(["add", "broken", index_path.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("error:"));

    sidx_cmd(tmp.path())
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn validate_fails_for_missing_alias() {
    let tmp = tempdir().unwrap();
    sidx_cmd(tmp.path())
        .args(["validate", "no-such-source"])
        .assert()
        .failure();
}

#[tokio::test]
async fn update_honors_conditional_fetch() {
    let tmp = tempdir().unwrap();
    let server = MockServer::start().await;
    let url = format!("{}/search_index.js", server.uri());

    Mock::given(method("GET"))
        .and(path("/search_index.js"))
        .and(header("if-none-match", "\"v1\""))
        .respond_with(ResponseTemplate::new(304))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search_index.js"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("etag", "\"v1\"")
                .set_body_string(SAMPLE_JS),
        )
        .mount(&server)
        .await;

    sidx_cmd(tmp.path())
        .args(["add", "remote", &url])
        .assert()
        .success();

    sidx_cmd(tmp.path())
        .args(["update", "remote"])
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
}
