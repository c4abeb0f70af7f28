mod containerlab;
mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::Result;

pub use containerlab::ContainerlabAdapter;
pub use mock::{CallKind, MockAdapter};

/// Outcome of one command executed on a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmdResult {
    pub rc: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CmdResult {
    pub fn new(rc: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            rc,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn ok(stdout: impl Into<String>) -> Self {
        Self::new(0, stdout, "")
    }

    pub fn failed(rc: i32, stderr: impl Into<String>) -> Self {
        Self::new(rc, "", stderr)
    }

    pub fn success(&self) -> bool {
        self.rc == 0
    }

    /// stdout and stderr joined and lowercased, for token matching.
    pub fn combined_lower(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr).to_lowercase()
    }
}

/// Access to the lab's nodes.
///
/// A non-zero return code is data, not an error; `Err` means the command
/// could not be executed at all.
#[async_trait]
pub trait Adapter: Send + Sync {
    async fn exec(&self, node: &str, command: &str) -> Result<CmdResult>;

    /// EOS CLI execution. Any privilege escalation is the adapter's business.
    async fn eos_cli(&self, node: &str, command: &str) -> Result<CmdResult>;

    fn node_kind(&self, node: &str) -> String;

    fn list_nodes(&self) -> Vec<String>;

    fn lab_dir(&self) -> &Path;

    fn desired_config_path(&self, node: &str) -> PathBuf {
        self.lab_dir().join("configs").join(format!("{}.cfg", node))
    }
}

/// Desired configuration text for `node`, or `None` when no file exists.
pub fn read_desired_config(adapter: &dyn Adapter, node: &str) -> Result<Option<String>> {
    let path = adapter.desired_config_path(node);
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(std::fs::read_to_string(path)?))
}
