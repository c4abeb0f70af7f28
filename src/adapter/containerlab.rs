use async_trait::async_trait;
use glob::glob;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;
use crate::error::{FabDriftError, Result};
use super::{Adapter, CmdResult};

const ENABLE_MARKERS: [&str; 2] = ["privileged mode required", "% invalid input"];

/// Runs commands inside containerlab nodes through `docker exec`.
pub struct ContainerlabAdapter {
    lab_dir: PathBuf,
    topology_file: PathBuf,
    clab_name: String,
    nodes: Vec<String>,
    kinds: HashMap<String, String>,
}

impl ContainerlabAdapter {
    pub fn new(repo_root: impl Into<PathBuf>, lab: &str) -> Result<Self> {
        let lab_dir = repo_root.into().join(lab);
        let topology_file = resolve_topology_path(&lab_dir, lab)?;

        let content = fs::read_to_string(&topology_file)?;
        let topology: serde_yaml::Value = serde_yaml::from_str(&content)?;

        let clab_name = topology
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or(lab)
            .to_string();

        let mut nodes = Vec::new();
        let mut kinds = HashMap::new();
        if let Some(mapping) = topology
            .get("topology")
            .and_then(|t| t.get("nodes"))
            .and_then(|n| n.as_mapping())
        {
            for (name, attrs) in mapping {
                let Some(name) = name.as_str() else {
                    continue;
                };
                let kind = attrs
                    .get("kind")
                    .and_then(|k| k.as_str())
                    .unwrap_or("unknown");
                nodes.push(name.to_string());
                kinds.insert(name.to_string(), kind.to_string());
            }
        }

        debug!(
            "Topology {} ({} nodes) from {}",
            clab_name,
            nodes.len(),
            topology_file.display()
        );

        Ok(Self {
            lab_dir,
            topology_file,
            clab_name,
            nodes,
            kinds,
        })
    }

    pub fn topology_file(&self) -> &Path {
        &self.topology_file
    }

    pub fn container_name(&self, node: &str) -> String {
        format!("clab-{}-{}", self.clab_name, node)
    }

    async fn docker(&self, node: &str, args: &[&str]) -> Result<CmdResult> {
        let output = Command::new("docker")
            .args(args)
            .output()
            .await
            .map_err(|e| FabDriftError::adapter(node, format!("docker exec failed: {}", e)))?;

        Ok(CmdResult::new(
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stdout).trim(),
            String::from_utf8_lossy(&output.stderr).trim(),
        ))
    }
}

fn resolve_topology_path(lab_dir: &Path, lab: &str) -> Result<PathBuf> {
    let direct = lab_dir.join(format!("{}.clab.yml", lab));
    if direct.exists() {
        return Ok(direct);
    }

    let pattern = lab_dir.join("*.clab.yml");
    let mut files: Vec<PathBuf> = glob(&pattern.to_string_lossy())?
        .filter_map(|r| r.ok())
        .collect();
    files.sort();

    files.into_iter().next().ok_or_else(|| {
        FabDriftError::Topology(format!("No .clab.yml found under {}", lab_dir.display()))
    })
}

fn needs_enable(result: &CmdResult) -> bool {
    let combined = result.combined_lower();
    ENABLE_MARKERS.iter().any(|m| combined.contains(m))
}

#[async_trait]
impl Adapter for ContainerlabAdapter {
    async fn exec(&self, node: &str, command: &str) -> Result<CmdResult> {
        let container = self.container_name(node);
        self.docker(node, &["exec", &container, "bash", "-lc", command]).await
    }

    async fn eos_cli(&self, node: &str, command: &str) -> Result<CmdResult> {
        let container = self.container_name(node);
        let first = self.docker(node, &["exec", &container, "Cli", "-c", command]).await?;
        if !needs_enable(&first) {
            return Ok(first);
        }

        debug!("Retrying '{}' on {} in enable mode", command, node);
        let script = format!("cat <<'EOF' | Cli\nenable\n{}\nEOF", command);
        let second = self.docker(node, &["exec", &container, "bash", "-lc", &script]).await?;

        if second.success() && !second.combined_lower().contains("privileged mode required") {
            Ok(second)
        } else {
            Ok(first)
        }
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
