//! TestWorld pattern for declarative integration test setup.
//!
//! Provides a fluent interface for:
//! - Creating isolated test environments with a log directory
//! - Writing logs, addenda, group files and fake data files
//! - Executing the CLI with a private configuration file

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use qoelog_testing::{PacketBuilder, TestWorld};
///
/// let world = TestWorld::new()
///     .with_log("capture.log", &PacketBuilder::new("Test", "01-Jan-2022 10:00:00").build());
///
/// let log_dir = world.log_dir().to_string_lossy().into_owned();
/// let result = world.run(&["search", &log_dir]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    cwd: PathBuf,
    log_dir: PathBuf,
    config_path: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_path = temp_dir.path().to_path_buf();
        let log_dir = base_path.join("logs");
        fs::create_dir_all(&log_dir).expect("Failed to create log dir");

        Self {
            cwd: base_path.clone(),
            config_path: base_path.join("config.toml"),
            temp_dir,
            log_dir,
            env_vars: HashMap::new(),
        }
    }

    /// Directory holding `*.log`, `*.ad-log` and `*.gr-log` files.
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the temp directory root.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Config file passed to every CLI run (may not exist).
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Write a file relative to the temp root, creating parent directories.
    pub fn write_file(&self, relative: impl AsRef<Path>, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// Write a file into the log directory.
    pub fn write_log(&self, name: &str, contents: &str) -> PathBuf {
        self.write_file(Path::new("logs").join(name), contents)
    }

    pub fn with_log(self, name: &str, contents: &str) -> Self {
        self.write_log(name, contents);
        self
    }

    /// Create an empty data file under the log directory.
    pub fn with_data_file(self, relative: impl AsRef<Path>) -> Self {
        self.write_file(Path::new("logs").join(relative), "");
        self
    }

    /// Set a file's modification time, in seconds since the epoch.
    pub fn set_mtime(&self, relative: impl AsRef<Path>, unix_seconds: i64) {
        let path = self.temp_dir.path().join(relative);
        let time = filetime::FileTime::from_unix_time(unix_seconds, 0);
        filetime::set_file_mtime(&path, time).expect("Failed to set mtime");
    }

    pub fn with_config(self, toml: &str) -> Self {
        fs::write(&self.config_path, toml).expect("Failed to write config");
        self
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Configure a CLI command with this test environment's settings.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--config").arg(&self.config_path);
        cmd.current_dir(&self.cwd);
        cmd.env_remove("RUST_LOG");
        cmd.env_remove("QOELOG_CONFIG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the `qoelog` binary and capture its output.
    ///
    /// # Note
    /// This method uses `Command::cargo_bin()` which requires the binary to be
    /// built, which cargo test does automatically for the workspace.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("qoelog")
            .map_err(|e| anyhow::anyhow!("Failed to find qoelog binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    /// Check if the command succeeded.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
