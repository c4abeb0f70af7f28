use colored::Colorize;
use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};
use super::checksum::sha256_text;

const ERROR_TOKENS: [&str; 4] = ["invalid input", "error:", "% invalid", "command not found"];
const MIN_CONFIG_LINES: usize = 5;
const PREVIEW_LINES: usize = 5;

/// Per-node configuration drift finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConfigDrift {
    CollectionError {
        node: String,
        message: String,
        rc: i64,
        stderr: String,
        running_preview: String,
    },
    Changed {
        node: String,
        desired_hash: String,
        running_hash: String,
        desired_lines: usize,
        running_lines: usize,
        lines_added: usize,
        lines_removed: usize,
    },
}

impl ConfigDrift {
    pub fn node(&self) -> &str {
        match self {
            ConfigDrift::CollectionError { node, .. } | ConfigDrift::Changed { node, .. } => node,
        }
    }

    pub fn is_collection_error(&self) -> bool {
        matches!(self, ConfigDrift::CollectionError { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            ConfigDrift::CollectionError { node, rc, .. } => {
                format!("{}: running-config unavailable (rc={})", node, rc)
            }
            ConfigDrift::Changed { node, lines_added, lines_removed, .. } => {
                format!("{}: +{} -{} lines", node, lines_added, lines_removed)
            }
        }
    }
}

/// Running-config output is trusted only if it is long enough and carries
/// no CLI error markers.
pub fn is_valid_running_config(raw: &str) -> bool {
    let text = raw.trim();
    if text.is_empty() {
        return false;
    }
    if text.lines().filter(|l| !l.trim().is_empty()).count() < MIN_CONFIG_LINES {
        return false;
    }
    let lower = text.to_lowercase();
    !ERROR_TOKENS.iter().any(|t| lower.contains(t))
}

/// Compare desired and running text for one node. `None` means no drift.
pub fn compare_config(node: &str, desired: &str, running: &str, rc: i64, stderr: &str) -> Option<ConfigDrift> {
    if rc != 0 || !is_valid_running_config(running) {
        return Some(ConfigDrift::CollectionError {
            node: node.to_string(),
            message: "Unable to retrieve valid running-config output".to_string(),
            rc,
            stderr: stderr.to_string(),
            running_preview: running.lines().take(PREVIEW_LINES).collect::<Vec<_>>().join("\n"),
        });
    }

    let desired_hash = sha256_text(desired);
    let running_hash = sha256_text(running);
    if desired_hash == running_hash {
        return None;
    }

    let (lines_added, lines_removed) = line_changes(desired, running);
    Some(ConfigDrift::Changed {
        node: node.to_string(),
        desired_hash,
        running_hash,
        desired_lines: desired.lines().count(),
        running_lines: running.lines().count(),
        lines_added,
        lines_removed,
    })
}

/// Lines present only in running (added) and only in desired (removed).
pub fn line_changes(desired: &str, running: &str) -> (usize, usize) {
    let diff = TextDiff::from_lines(desired, running);
    let mut added = 0;
    let mut removed = 0;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }
    (added, removed)
}

pub fn format_config_diff(node: &str, desired: &str, running: &str) -> String {
    let diff = TextDiff::from_lines(desired, running);
    let mut output = String::new();

    output.push_str(&format!("── {} (desired → running) ──\n", node).dimmed().to_string());
    for hunk in diff.unified_diff().context_radius(2).iter_hunks() {
        output.push_str(&hunk.header().to_string().cyan().to_string());
        output.push('\n');
        for change in hunk.iter_changes() {
            let line = change.to_string();
            let line = line.trim_end();
            let formatted = match change.tag() {
                ChangeTag::Delete => format!("- {}", line).red().to_string(),
                ChangeTag::Insert => format!("+ {}", line).green().to_string(),
                ChangeTag::Equal => format!("  {}", line),
            };
            output.push_str(&formatted);
            output.push('\n');
        }
    }

    output
}
