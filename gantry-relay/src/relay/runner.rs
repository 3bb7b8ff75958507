//! Tool process execution boundary
//!
//! Runners receive an argument vector, never a command line: the relay does
//! no shell interpretation anywhere. `ProcessToolRunner` invokes the
//! versioned binary out-of-process; `DryRunToolRunner` only logs what it
//! would have run.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::info;

use crate::error::{RelayError, RelayResult};

/// Captured output of a tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Combined stdout/stderr
    pub output: String,
    pub exit_code: i32,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes a tool binary against a materialized connection config.
/// An `Err` means the runner itself failed; a non-zero exit comes back as a
/// normal [`ToolOutput`] so captured output is never lost.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(
        &self,
        version: &str,
        config_path: &Path,
        args: &[String],
    ) -> RelayResult<ToolOutput>;
}

/// Builds the argv for one invocation: the versioned binary, the connection
/// config flag, then the caller's arguments verbatim
fn command_line(tool_dir: &Path, version: &str, config_path: &Path, args: &[String]) -> (PathBuf, Vec<String>) {
    let binary = tool_dir.join(version);
    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push(format!("--kubeconfig={}", config_path.display()));
    argv.extend_from_slice(args);
    (binary, argv)
}

/// Canonical runner: spawns the versioned binary with tokio
pub struct ProcessToolRunner {
    tool_dir: PathBuf,
}

impl ProcessToolRunner {
    pub fn new(tool_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool_dir: tool_dir.into(),
        }
    }
}

#[async_trait]
impl ToolRunner for ProcessToolRunner {
    async fn run(
        &self,
        version: &str,
        config_path: &Path,
        args: &[String],
    ) -> RelayResult<ToolOutput> {
        let (binary, argv) = command_line(&self.tool_dir, version, config_path, args);
        info!(binary = %binary.display(), ?argv, "running tool");

        let output = tokio::process::Command::new(&binary)
            .args(&argv)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| RelayError::Runner(format!("spawn {}: {}", binary.display(), e)))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(ToolOutput {
            output: combined,
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

/// No-op runner: logs and echoes the command it could have run. Mostly
/// useful for testing and provider-less deployments.
#[derive(Debug, Clone, Default)]
pub struct DryRunToolRunner {
    tool_dir: PathBuf,
}

impl DryRunToolRunner {
    pub fn new(tool_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool_dir: tool_dir.into(),
        }
    }
}

#[async_trait]
impl ToolRunner for DryRunToolRunner {
    async fn run(
        &self,
        version: &str,
        config_path: &Path,
        args: &[String],
    ) -> RelayResult<ToolOutput> {
        let (binary, argv) = command_line(&self.tool_dir, version, config_path, args);
        let msg = format!("dry run: {} {}", binary.display(), argv.join(" "));
        info!("{}", msg);
        Ok(ToolOutput {
            output: msg,
            exit_code: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_keeps_args_verbatim() {
        let args = vec![
            "get".to_string(),
            "pods".to_string(),
            "-l".to_string(),
            "app=web; rm -rf /".to_string(),
        ];
        let (binary, argv) =
            command_line(Path::new("/opt/tools"), "1.9.1", Path::new("/tmp/c.yaml"), &args);
        assert_eq!(binary, PathBuf::from("/opt/tools/1.9.1"));
        assert_eq!(argv[0], "--kubeconfig=/tmp/c.yaml");
        // The shell-looking argument stays one opaque element
        assert_eq!(argv[4], "app=web; rm -rf /");
        assert_eq!(argv.len(), 5);
    }

    #[tokio::test]
    async fn test_dry_run_echoes_command() {
        let runner = DryRunToolRunner::new("/opt/tools");
        let out = runner
            .run("1.9.1", Path::new("/tmp/c.yaml"), &["version".to_string()])
            .await
            .unwrap();
        assert!(out.success());
        assert!(out.output.contains("/opt/tools/1.9.1"));
        assert!(out.output.contains("version"));
    }
}
