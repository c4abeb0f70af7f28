use colored::Colorize;
use tabled::Tabled;
use crate::check::{CheckResult, CheckStatus, RunSummary};

#[derive(Debug, Clone, Tabled)]
pub struct ResultTableRow {
    #[tabled(rename = "Phase")]
    pub phase: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Severity")]
    pub severity: String,
    #[tabled(rename = "Check")]
    pub name: String,
    #[tabled(rename = "Message")]
    pub message: String,
}

impl From<&CheckResult> for ResultTableRow {
    fn from(result: &CheckResult) -> Self {
        ResultTableRow {
            phase: result.phase.to_string(),
            status: format!("{} {}", status_symbol(result.status), result.status),
            severity: result.severity.to_string(),
            name: result.name.clone(),
            message: result.message.clone(),
        }
    }
}

fn status_symbol(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "✓",
        CheckStatus::Fail => "✗",
        CheckStatus::Warn => "⚠",
        CheckStatus::Skip => "○",
    }
}

/// One colored `[phase] STATUS name - message` line per result.
pub fn render_lines(summary: &RunSummary) -> Vec<String> {
    summary
        .results
        .iter()
        .map(|r| {
            let status = format!("{:4}", r.status.as_str());
            let status = match r.status {
                CheckStatus::Pass => status.green(),
                CheckStatus::Fail => status.red(),
                CheckStatus::Warn => status.yellow(),
                CheckStatus::Skip => status.dimmed(),
            };
            format!("[{}] {} {} - {}", r.phase, status, r.name, r.message)
        })
        .collect()
}
