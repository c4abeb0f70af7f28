mod checksum;
mod config;
mod detector;
mod diff;
mod snapshot;

pub use checksum::{sha256_json, sha256_text};
pub use config::{compare_config, format_config_diff, is_valid_running_config, line_changes, ConfigDrift};
pub use detector::{drift_summary, DriftDetector, DriftOutcome};
pub use diff::{diff_maps, diff_values, strip_volatile, DriftEntry, DriftKind, VOLATILE_FIELDS};
pub use snapshot::{Fingerprint, Snapshot};
