//! End-to-end tests for the suite runner
//!
//! These tests spawn the mock chat server + WebDriver endpoint and run
//! the suite against it, covering the full passing flow, scenario
//! filtering, and the reachability checks.

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};

use chatsuite::browser;
use chatsuite::common::config::Config;
use chatsuite::common::{parse_listen_address, Error};
use chatsuite::suite;

/// Mock server handle, killed on drop
struct MockServer {
    child: Child,
    address: String,
}

impl MockServer {
    fn spawn() -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_mock_server"))
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("failed to spawn mock server");

        let stdout = child.stdout.take().expect("mock server has no stdout");
        let mut line = String::new();
        BufReader::new(stdout)
            .read_line(&mut line)
            .expect("failed to read mock server address");
        let address = parse_listen_address(&line)
            .unwrap_or_else(|| panic!("unexpected mock server output: {line:?}"));

        Self { child, address }
    }

    fn url(&self) -> String {
        format!("http://{}", self.address)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Config pointed at the mock, with short waits: against the mock,
/// nothing appears late, it is either there or wrong.
fn config_for(mock: &MockServer) -> Config {
    let mut config = Config::default();
    config.server.base_url = mock.url();
    config.webdriver.url = mock.url();
    config.timeouts.element_wait_secs = 2;
    config.timeouts.poll_interval_ms = 10;
    config.timeouts.settle_ms = 10;
    config
}

#[tokio::test]
async fn full_suite_passes_against_mock() {
    let mock = MockServer::spawn();
    let config = config_for(&mock);

    let report = suite::run_suite(&config, None, false)
        .await
        .expect("suite aborted during setup");

    assert_eq!(report.results.len(), 2);
    assert!(
        report.all_passed(),
        "unexpected failures: {:?}",
        report.results
    );
}

#[tokio::test]
async fn single_scenario_can_run_alone() {
    let mock = MockServer::spawn();
    let config = config_for(&mock);

    let report = suite::run_suite(&config, Some("view-archived-channels"), false)
        .await
        .expect("suite aborted during setup");

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].name, "view-archived-channels");
    assert!(report.all_passed(), "failure: {:?}", report.results);
}

#[tokio::test]
async fn scenarios_leave_reusable_state_behind() {
    // Same mock, two runs back to back: each run re-creates its own
    // fixtures and re-sets the config flag, so nothing from the first
    // run may leak into the second.
    let mock = MockServer::spawn();
    let config = config_for(&mock);

    let first = suite::run_suite(&config, None, false).await.unwrap();
    assert!(first.all_passed(), "first run: {:?}", first.results);

    let second = suite::run_suite(&config, None, false).await.unwrap();
    assert!(second.all_passed(), "second run: {:?}", second.results);
}

#[tokio::test]
async fn unknown_scenario_is_rejected() {
    let mock = MockServer::spawn();
    let config = config_for(&mock);

    let result = suite::run_suite(&config, Some("no-such-scenario"), false).await;
    assert!(matches!(result, Err(Error::UnknownScenario(_))));
}

#[tokio::test]
async fn unreachable_server_aborts_setup() {
    // A closed port: setup must fail before any scenario runs
    let mut config = Config::default();
    config.server.base_url = "http://127.0.0.1:1".to_string();
    config.webdriver.url = "http://127.0.0.1:1".to_string();
    config.timeouts.request_secs = 2;

    let result = suite::run_suite(&config, None, false).await;
    assert!(matches!(result, Err(Error::ServerUnreachable { .. })));
}

#[tokio::test]
async fn webdriver_status_probe() {
    let mock = MockServer::spawn();
    let config = config_for(&mock);

    let ready = browser::webdriver_ready(&config.webdriver.url, &config.timeouts)
        .await
        .expect("status probe failed");
    assert!(ready);
}

#[test]
fn cli_lists_scenarios() {
    let output = Command::new(env!("CARGO_BIN_EXE_chatsuite"))
        .arg("list")
        .output()
        .expect("failed to run chatsuite list");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("more-channels-modal"));
    assert!(stdout.contains("view-archived-channels"));
}

#[test]
fn cli_run_exits_zero_on_success() {
    let mock = MockServer::spawn();

    let output = Command::new(env!("CARGO_BIN_EXE_chatsuite"))
        .args([
            "run",
            "--server-url",
            &mock.url(),
            "--webdriver-url",
            &mock.url(),
        ])
        .output()
        .expect("failed to run chatsuite run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "suite run failed:\n{stdout}\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("2 passed, 0 failed"));
}
