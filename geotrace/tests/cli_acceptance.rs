use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
        }
    }

    fn write_config(&self, content: &str) -> PathBuf {
        let path = self.xdg_config.join("config.toml");
        fs::write(&path, content).expect("failed to write config");
        path
    }

    fn write_trace(&self, content: &str) -> PathBuf {
        let path = self.home.join("fixes.jsonl");
        fs::write(&path, content).expect("failed to write trace");
        path
    }
}

fn run_geotrace(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("geotrace"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .output()
        .expect("failed to execute geotrace")
}

const VALID_CONFIG: &str = r#"
[agent]
device_id = "field-unit-7"
server_url = "https://collector.example.com"
interval_ms = 5000
battery_threshold = 20
"#;

#[test]
fn run_rejects_missing_device_identity() {
    let env = CliTestEnv::new();
    let config = env.write_config(
        r#"
[agent]
server_url = "https://collector.example.com"
"#,
    );
    let trace = env.write_trace("");

    let output = run_geotrace(
        &env,
        &[
            "--config",
            config.to_str().unwrap(),
            "run",
            "--trace",
            trace.to_str().unwrap(),
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("device_id"), "stderr was: {stderr}");
}

#[test]
fn run_rejects_missing_server_url() {
    let env = CliTestEnv::new();
    let config = env.write_config(
        r#"
[agent]
device_id = "field-unit-7"
"#,
    );
    let trace = env.write_trace("");

    let output = run_geotrace(
        &env,
        &[
            "--config",
            config.to_str().unwrap(),
            "run",
            "--trace",
            trace.to_str().unwrap(),
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("server_url"), "stderr was: {stderr}");
}

#[test]
fn run_rejects_missing_trace_file() {
    let env = CliTestEnv::new();
    let config = env.write_config(VALID_CONFIG);

    let output = run_geotrace(
        &env,
        &[
            "--config",
            config.to_str().unwrap(),
            "run",
            "--trace",
            "/nonexistent/fixes.jsonl",
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("fix trace"), "stderr was: {stderr}");
}

#[test]
fn status_reports_resolved_config() {
    let env = CliTestEnv::new();
    let config = env.write_config(VALID_CONFIG);

    let output = run_geotrace(&env, &["--config", config.to_str().unwrap(), "status"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("field-unit-7"), "stdout was: {stdout}");
    assert!(stdout.contains("https://collector.example.com"));
    assert!(stdout.contains("5000 ms"));
    assert!(!stdout.contains("invalid"), "stdout was: {stdout}");
}

#[test]
fn status_flags_invalid_config_without_failing() {
    let env = CliTestEnv::new();

    // No config file at all: defaults resolve, identity is missing.
    let output = run_geotrace(&env, &["status"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(not set)"), "stdout was: {stdout}");
    assert!(stdout.contains("invalid"), "stdout was: {stdout}");
}
