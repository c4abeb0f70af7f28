use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use super::types::{CheckDef, Phase, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Skip,
}

impl CheckStatus {
    pub const ALL: [CheckStatus; 4] = [
        CheckStatus::Pass,
        CheckStatus::Fail,
        CheckStatus::Warn,
        CheckStatus::Skip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Warn => "WARN",
            CheckStatus::Skip => "SKIP",
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub phase: Phase,
    pub name: String,
    pub status: CheckStatus,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub evidence: Map<String, Value>,
    #[serde(default)]
    pub remediation: Option<String>,
}

impl CheckResult {
    pub fn passed(phase: Phase, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            phase,
            name: name.into(),
            status: CheckStatus::Pass,
            severity: Severity::Info,
            message: message.into(),
            evidence: Map::new(),
            remediation: None,
        }
    }

    pub fn failed(
        phase: Phase,
        name: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            name: name.into(),
            status: CheckStatus::Fail,
            severity,
            message: message.into(),
            evidence: Map::new(),
            remediation: None,
        }
    }

    /// PASS (at INFO) when `ok`, otherwise FAIL at the check's severity.
    pub fn outcome(
        phase: Phase,
        name: impl Into<String>,
        ok: bool,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        if ok {
            Self::passed(phase, name, message)
        } else {
            Self::failed(phase, name, severity, message)
        }
    }

    pub fn unsupported(check: &CheckDef) -> Self {
        Self::failed(
            check.phase,
            check.name.clone(),
            check.severity,
            format!("Unsupported check kind: {}", check.kind),
        )
    }

    pub fn crashed(check: &CheckDef, error: impl std::fmt::Display) -> Self {
        Self::failed(
            check.phase,
            check.name.clone(),
            Severity::Error,
            format!("Check crashed: {}", error),
        )
    }

    /// Attach evidence; non-object values are stored under `value`.
    pub fn with_evidence(mut self, evidence: Value) -> Self {
        self.evidence = match evidence {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        self
    }

    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }

    pub fn is_blocking_error(&self) -> bool {
        self.status == CheckStatus::Fail && self.severity == Severity::Error
    }
}

/// Ordered results of one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub results: Vec<CheckResult>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn extend(&mut self, results: impl IntoIterator<Item = CheckResult>) {
        self.results.extend(results);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.results.iter().any(CheckResult::is_blocking_error)
    }

    /// 1 iff some result is FAIL at ERROR severity.
    pub fn exit_code(&self) -> i32 {
        if self.has_errors() { 1 } else { 0 }
    }

    pub fn counts_by_status(&self) -> BTreeMap<CheckStatus, usize> {
        let mut counts: BTreeMap<CheckStatus, usize> =
            CheckStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for r in &self.results {
            *counts.entry(r.status).or_default() += 1;
        }
        counts
    }

    pub fn counts_by_phase(&self) -> BTreeMap<Phase, usize> {
        let mut counts: BTreeMap<Phase, usize> = BTreeMap::new();
        for r in &self.results {
            *counts.entry(r.phase).or_default() += 1;
        }
        counts
    }

    pub fn failed(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| r.status == CheckStatus::Fail)
    }

    pub fn to_report(&self) -> Value {
        let by_status: Map<String, Value> = self
            .counts_by_status()
            .into_iter()
            .map(|(status, n)| (status.as_str().to_string(), json!(n)))
            .collect();
        let by_phase: Map<String, Value> = self
            .counts_by_phase()
            .into_iter()
            .map(|(phase, n)| (phase.as_str().to_string(), json!(n)))
            .collect();

        json!({
            "summary": {
                "counts_by_status": by_status,
                "counts_by_phase": by_phase,
                "exit_code": self.exit_code(),
            },
            "results": self.results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass() -> CheckResult {
        CheckResult::passed(Phase::Underlay, "ok", "ok")
    }

    #[test]
    fn test_exit_code_all_pass() {
        let mut summary = RunSummary::new();
        summary.add(pass());
        summary.add(pass());
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn test_exit_code_error_fail() {
        let mut summary = RunSummary::new();
        summary.add(pass());
        assert_eq!(summary.exit_code(), 0);
        summary.add(CheckResult::failed(Phase::Underlay, "bad", Severity::Error, "bad"));
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_warn_fail_is_not_blocking() {
        let mut summary = RunSummary::new();
        summary.add(pass());
        summary.add(CheckResult::failed(Phase::Dataplane, "meh", Severity::Warn, "meh"));
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn test_exit_code_warn_status_at_error_severity() {
        let mut summary = RunSummary::new();
        let mut warn = CheckResult::failed(Phase::Intent, "w", Severity::Error, "w");
        warn.status = CheckStatus::Warn;
        summary.add(warn);
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn test_outcome_pass_downgrades_severity() {
        let result = CheckResult::outcome(Phase::Intent, "x", true, Severity::Error, "m");
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.severity, Severity::Info);

        let result = CheckResult::outcome(Phase::Intent, "x", false, Severity::Warn, "m");
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.severity, Severity::Warn);
    }

    #[test]
    fn test_counts_zero_filled() {
        let mut summary = RunSummary::new();
        summary.add(pass());
        let counts = summary.counts_by_status();
        assert_eq!(counts.len(), 4);
        assert_eq!(counts[&CheckStatus::Pass], 1);
        assert_eq!(counts[&CheckStatus::Skip], 0);
    }

    #[test]
    fn test_report_shape() {
        let mut summary = RunSummary::new();
        summary.add(pass());
        summary.add(CheckResult::failed(Phase::ControlPlane, "bad", Severity::Error, "bad")
            .with_evidence(json!({"rc": 1})));
        let report = summary.to_report();

        assert_eq!(report["summary"]["exit_code"], 1);
        assert_eq!(report["summary"]["counts_by_status"]["FAIL"], 1);
        assert_eq!(report["summary"]["counts_by_phase"]["control-plane"], 1);
        assert_eq!(report["results"][1]["status"], "FAIL");
        assert_eq!(report["results"][1]["phase"], "control-plane");
        assert_eq!(report["results"][1]["evidence"]["rc"], 1);
    }
}
