use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use crate::error::{FabDriftError, Result};
use super::{Adapter, CmdResult};

/// Which entry point a recorded call went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Exec,
    EosCli,
}

/// Scripted in-memory lab. Unscripted commands answer rc=127.
pub struct MockAdapter {
    lab_dir: PathBuf,
    nodes: Vec<String>,
    kinds: HashMap<String, String>,
    responses: HashMap<(CallKind, String, String), CmdResult>,
    broken: HashMap<String, String>,
    calls: Mutex<Vec<(CallKind, String, String)>>,
}

impl MockAdapter {
    pub fn new(lab_dir: impl Into<PathBuf>) -> Self {
        Self {
            lab_dir: lab_dir.into(),
            nodes: Vec::new(),
            kinds: HashMap::new(),
            responses: HashMap::new(),
            broken: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_node(mut self, node: &str, kind: &str) -> Self {
        if !self.nodes.iter().any(|n| n == node) {
            self.nodes.push(node.to_string());
        }
        self.kinds.insert(node.to_string(), kind.to_string());
        self
    }

    pub fn with_exec(mut self, node: &str, command: &str, result: CmdResult) -> Self {
        self.responses
            .insert((CallKind::Exec, node.to_string(), command.to_string()), result);
        self
    }

    pub fn with_eos(mut self, node: &str, command: &str, result: CmdResult) -> Self {
        self.responses
            .insert((CallKind::EosCli, node.to_string(), command.to_string()), result);
        self
    }

    /// Every call against `node` fails with an adapter error.
    pub fn with_broken_node(mut self, node: &str, message: &str) -> Self {
        self.broken.insert(node.to_string(), message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(CallKind, String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, kind: CallKind, node: &str, command: &str) -> usize {
        self.calls()
            .iter()
            .filter(|(k, n, c)| *k == kind && n == node && c == command)
            .count()
    }

    fn respond(&self, kind: CallKind, node: &str, command: &str) -> Result<CmdResult> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((kind, node.to_string(), command.to_string()));
        }
        if let Some(message) = self.broken.get(node) {
            return Err(FabDriftError::adapter(node, message.clone()));
        }
        Ok(self
            .responses
            .get(&(kind, node.to_string(), command.to_string()))
            .cloned()
            .unwrap_or_else(|| CmdResult::failed(127, format!("no scripted response for '{}'", command))))
    }
}

#[async_trait]
impl Adapter for MockAdapter {
    async fn exec(&self, node: &str, command: &str) -> Result<CmdResult> {
        self.respond(CallKind::Exec, node, command)
    }

    async fn eos_cli(&self, node: &str, command: &str) -> Result<CmdResult> {
        self.respond(CallKind::EosCli, node, command)
    }

    fn node_kind(&self, node: &str) -> String {
        self.kinds
            .get(node)
            .cloned()
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn list_nodes(&self) -> Vec<String> {
        self.nodes.clone()
    }

    fn lab_dir(&self) -> &Path {
        &self.lab_dir
    }
}
