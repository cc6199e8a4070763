//! Integration tests for CLI output behavior
//!
//! Every run gets its own HOME and working directory so no real config or
//! token leaks in. Commands that talk to the API point at a local stand-in.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::process::{Command, Output};

use axum::Router;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tempfile::TempDir;

const TOKEN: &str = "cli-token";

struct Sandbox {
    home: TempDir,
    work: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            work: TempDir::new().unwrap(),
        }
    }

    fn write_user_config(&self, contents: &str) {
        let dir = self.home.path().join(".shipwatch");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), contents).unwrap();
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_shipwatch"))
            .args(args)
            .env("HOME", self.home.path())
            .env_remove("SHIPWATCH_TOKEN")
            .env("NO_COLOR", "1")
            .current_dir(self.work.path())
            .output()
            .unwrap_or_else(|e| panic!("Failed to execute 'shipwatch {}': {}", args.join(" "), e))
    }
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "exit code {:?}. stderr: {}",
        output.status.code(),
        stderr_of(output)
    );
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

async fn teams(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    axum::Json(json!({ "teams": [{ "id": "team_1", "slug": "acme", "name": "Acme" }] }))
        .into_response()
}

async fn projects(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    axum::Json(json!({ "projects": [{ "id": "prj_1", "name": "web" }] })).into_response()
}

async fn deployments(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    let scope = query
        .get("teamId")
        .cloned()
        .unwrap_or_else(|| "personal".to_string());
    axum::Json(json!({
        "deployments": [{
            "uid": format!("dpl_{scope}"),
            "name": "web",
            "url": format!("web-{scope}.vercel.app"),
            "created": now_ms(),
            "state": "READY",
            "target": "production",
            "meta": { "githubCommitRef": "main" }
        }]
    }))
    .into_response()
}

/// Local API stand-in living on its own runtime for the duration of a test.
struct MockApi {
    addr: SocketAddr,
    _runtime: tokio::runtime::Runtime,
}

impl MockApi {
    fn start() -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/v2/teams", get(teams))
            .route("/v9/projects", get(projects))
            .route("/v6/deployments", get(deployments));
        runtime.spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            addr,
            _runtime: runtime,
        }
    }

    fn config(&self) -> String {
        format!(
            "[api]\ntoken = \"{TOKEN}\"\nbase_url = \"http://{}\"\n",
            self.addr
        )
    }
}

fn sandbox_with_api(api: &MockApi) -> Sandbox {
    let sandbox = Sandbox::new();
    sandbox.write_user_config(&api.config());
    sandbox
}

fn assert_no_json_logs(stdout: &str) {
    assert!(
        !stdout.contains(r#""event":"#),
        "stdout should not contain JSON logs, got: {}",
        stdout
    );
}

#[test]
fn test_missing_token_fails_with_guidance() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["list"]);

    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("No API token"), "stderr: {}", stderr);
    assert!(stderr.contains("SHIPWATCH_TOKEN"), "stderr: {}", stderr);
    assert_no_json_logs(&stdout_of(&output));
}

#[test]
fn test_quiet_by_default_verbose_emits_json_logs() {
    let sandbox = Sandbox::new();

    let quiet = sandbox.run(&["list"]);
    assert!(!stderr_of(&quiet).contains(r#""event":"#));

    let verbose = sandbox.run(&["-v", "list"]);
    let stderr = stderr_of(&verbose);
    assert!(
        stderr.contains(r#""event":"#),
        "verbose mode should emit JSON logs, got: {}",
        stderr
    );
    assert_no_json_logs(&stdout_of(&verbose));
}

#[test]
fn test_broken_config_warns_and_uses_defaults() {
    let sandbox = Sandbox::new();
    sandbox.write_user_config("[api\ntoken = ");

    let output = sandbox.run(&["list"]);
    let stderr = stderr_of(&output);
    assert!(
        stderr.contains("Warning: Could not load config"),
        "stderr: {}",
        stderr
    );
    // Defaults carry no token
    assert!(stderr.contains("No API token"), "stderr: {}", stderr);
}

#[test]
fn test_list_json_merges_personal_and_teams() {
    let api = MockApi::start();
    let sandbox = sandbox_with_api(&api);

    let output = sandbox.run(&["list", "--json"]);
    assert_success(&output);

    let parsed: Value = serde_json::from_str(&stdout_of(&output)).expect("stdout is JSON");
    assert!(parsed["fetched_at"].is_string());
    let mut ids: Vec<&str> = parsed["deployments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["dpl_personal", "dpl_team_1"]);
    assert_eq!(parsed["deployments"][0]["state"], "ready");
}

#[test]
fn test_list_team_flag_restricts_scope() {
    let api = MockApi::start();
    let sandbox = sandbox_with_api(&api);

    let output = sandbox.run(&["list", "--json", "--team", "team_1"]);
    assert_success(&output);

    let parsed: Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    let deployments = parsed["deployments"].as_array().unwrap();
    assert_eq!(deployments.len(), 1);
    assert_eq!(deployments[0]["id"], "dpl_team_1");
}

#[test]
fn test_list_table_output() {
    let api = MockApi::start();
    let sandbox = sandbox_with_api(&api);

    let output = sandbox.run(&["--no-color", "list"]);
    assert_success(&output);

    let stdout = stdout_of(&output);
    assert!(stdout.contains("State"), "stdout: {}", stdout);
    assert!(stdout.contains("https://web-team_1.vercel.app"));
    assert!(stdout.contains("main"));
    assert!(!stdout.contains('\x1b'), "no ANSI codes with --no-color");
    assert_no_json_logs(&stdout);
}

#[test]
fn test_teams_json() {
    let api = MockApi::start();
    let sandbox = sandbox_with_api(&api);

    let output = sandbox.run(&["teams", "--json"]);
    assert_success(&output);

    let parsed: Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(parsed["teams"][0]["id"], "team_1");
    assert_eq!(parsed["teams"][0]["slug"], "acme");
}

#[test]
fn test_projects_json_for_team() {
    let api = MockApi::start();
    let sandbox = sandbox_with_api(&api);

    let output = sandbox.run(&["projects", "--team", "team_1", "--json"]);
    assert_success(&output);

    let parsed: Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(parsed["scope"], "team_1");
    assert_eq!(parsed["projects"][0]["name"], "web");
}

#[test]
fn test_rejected_token_reports_http_error() {
    let api = MockApi::start();
    let sandbox = Sandbox::new();
    sandbox.write_user_config(&format!(
        "[api]\ntoken = \"wrong\"\nbase_url = \"http://{}\"\n",
        api.addr
    ));

    let output = sandbox.run(&["teams"]);
    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("Failed to list teams"), "stderr: {}", stderr);
    assert!(stderr.contains("403"), "stderr: {}", stderr);
}

#[test]
fn test_watch_once_prints_one_cycle() {
    let api = MockApi::start();
    let sandbox = sandbox_with_api(&api);

    let output = sandbox.run(&["watch", "--once"]);
    assert_success(&output);

    let stdout = stdout_of(&output);
    assert!(stdout.contains("web"), "stdout: {}", stdout);
    assert!(stdout.contains("idle polling"), "stdout: {}", stdout);
    assert!(!stdout.contains("Enter refreshes"));
}

#[test]
fn test_watch_once_without_token_fails() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["watch", "--once"]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("No API token"));
}
