pub mod error;
pub mod intent;
pub mod check;
pub mod adapter;
pub mod evidence;
pub mod drift;
pub mod report;

pub use error::{FabDriftError, Result};
pub use intent::{IntentLoader, IntentModel, IntentValidator, IntentLintReport, IntentWarning, Inventory, InventoryNode, TelemetryDefaults};
pub use check::{CheckDef, CheckKind, CheckEngine, CheckResult, CheckStatus, Phase, RunMode, RunSummary, Selector, Severity};
pub use adapter::{Adapter, CmdResult, ContainerlabAdapter, MockAdapter, read_desired_config};
pub use evidence::{EvidenceClient, EvidenceRecord, EvidenceSource, TelemetryTransport, DisabledTransport};
pub use drift::{ConfigDrift, DriftDetector, DriftEntry, DriftKind, DriftOutcome, Snapshot, Fingerprint, diff_values, drift_summary, format_config_diff};
pub use report::{ResultTableRow, render_lines, render_markdown, write_json_report, write_markdown_report};
