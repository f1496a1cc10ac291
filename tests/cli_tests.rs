//! Binary-level tests: pre-flight validation, exit codes, and output
//! behavior. Network-touching cases run against a local mock server or a
//! port nothing listens on; no test leaves the machine.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper: get a Command for the urnfinder binary.
fn urnfinder() -> assert_cmd::Command {
    cargo_bin_cmd!("urnfinder")
}

// ─────────────────────────────────────────────────────────────────────────────
// Pre-flight failures: abort before any network activity, non-zero exit
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn no_target_fails_fast() {
    urnfinder()
        .arg("--cookie")
        .arg("AQEDtest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("URL or an --input file"));
}

#[test]
fn missing_cookie_fails_fast() {
    urnfinder()
        .arg("https://www.linkedin.com/in/jdoe")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cookie"));
}

#[test]
fn cookie_and_cookie_file_conflict() {
    urnfinder()
        .arg("https://www.linkedin.com/in/jdoe")
        .arg("--cookie")
        .arg("AQEDtest")
        .arg("--cookie-file")
        .arg("whatever.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn unreadable_cookie_file_fails_fast() {
    urnfinder()
        .arg("https://www.linkedin.com/in/jdoe")
        .arg("--cookie-file")
        .arg("/nonexistent/cookie.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read cookie file"));
}

#[test]
fn unreadable_target_list_fails_fast() {
    urnfinder()
        .arg("--input")
        .arg("/nonexistent/urls.txt")
        .arg("--cookie")
        .arg("AQEDtest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read target list"));
}

#[test]
fn empty_target_list_fails_fast() {
    let tmp = TempDir::new().unwrap();
    let list = tmp.path().join("urls.txt");
    fs::write(&list, "# only comments\n\n").unwrap();

    urnfinder()
        .arg("--input")
        .arg(list.to_str().unwrap())
        .arg("--cookie")
        .arg("AQEDtest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("contains no URLs"));
}

#[test]
fn invalid_output_format_rejected() {
    urnfinder()
        .arg("https://www.linkedin.com/in/jdoe")
        .arg("--cookie")
        .arg("AQEDtest")
        .arg("--output-format")
        .arg("xml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Output format"));
}

#[test]
fn inverted_delay_range_rejected() {
    urnfinder()
        .arg("https://www.linkedin.com/in/jdoe")
        .arg("--cookie")
        .arg("AQEDtest")
        .arg("--delay-min")
        .arg("5")
        .arg("--delay-max")
        .arg("2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid delay range"));
}

#[test]
fn negative_delay_rejected() {
    urnfinder()
        .arg("https://www.linkedin.com/in/jdoe")
        .arg("--cookie")
        .arg("AQEDtest")
        .arg("--delay-min=-1")
        .arg("--delay-max=2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-negative"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Run behavior: failures drop items, zero successes write no file
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn zero_successes_reports_no_results_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("results.csv");

    // Nothing listens on port 1, so the single target fails on transport
    // and the run completes with no results.
    urnfinder()
        .arg("http://127.0.0.1:1/company/acme")
        .arg("--cookie")
        .arg("AQEDtest")
        .arg("--delay-min")
        .arg("0")
        .arg("--delay-max")
        .arg("0")
        .arg("-o")
        .arg(out.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("No results"));

    assert!(!out.exists(), "no file must be written on zero successes");
}

#[tokio::test(flavor = "multi_thread")]
async fn successful_run_writes_csv_with_fixed_columns() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/company/acme"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html>urn:li:fsd_company:987654</html>"),
        )
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("results.csv");
    let url = format!("{}/company/acme", server.uri());

    urnfinder()
        .arg(&url)
        .arg("--cookie")
        .arg("AQEDtest")
        .arg("--delay-min")
        .arg("0")
        .arg("--delay-max")
        .arg("0")
        .arg("-o")
        .arg(out.to_str().unwrap())
        .assert()
        .success();

    let content = fs::read_to_string(&out).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("input_url,entity_type,urn,entity_id"));
    assert_eq!(
        lines.next(),
        Some(format!("{},company,urn:li:fsd_company:987654,987654", url).as_str())
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn partial_results_still_exported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/company/good"))
        .respond_with(ResponseTemplate::new(200).set_body_string("urn:li:fsd_company:42"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/company/bad"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let list = tmp.path().join("urls.txt");
    fs::write(
        &list,
        format!(
            "{}/company/good\n{}/company/bad\n",
            server.uri(),
            server.uri()
        ),
    )
    .unwrap();
    let out = tmp.path().join("results.csv");

    urnfinder()
        .arg("--input")
        .arg(list.to_str().unwrap())
        .arg("--cookie")
        .arg("AQEDtest")
        .arg("--delay-min")
        .arg("0")
        .arg("--delay-max")
        .arg("0")
        .arg("-o")
        .arg(out.to_str().unwrap())
        .assert()
        .success();

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("urn:li:fsd_company:42"));
    // One header plus exactly one data row: the 404 item was dropped.
    assert_eq!(content.lines().count(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn json_format_writes_summary_and_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/in/jdoe"))
        .respond_with(ResponseTemplate::new(200).set_body_string("urn:li:fsd_profile:abc123"))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("results.json");

    urnfinder()
        .arg(format!("{}/in/jdoe", server.uri()))
        .arg("--cookie")
        .arg("AQEDtest")
        .arg("--delay-min")
        .arg("0")
        .arg("--delay-max")
        .arg("0")
        .arg("-f")
        .arg("json")
        .arg("-o")
        .arg(out.to_str().unwrap())
        .assert()
        .success();

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(parsed["summary"]["total_records"], 1);
    assert_eq!(parsed["records"][0]["entity_type"], "person");
    assert_eq!(parsed["records"][0]["entity_id"], "abc123");
}
