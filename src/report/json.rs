use serde_json::Value;
use std::path::Path;
use tracing::debug;
use crate::error::Result;
use super::write_text;

/// Pretty JSON with sorted keys, creating parent directories as needed.
pub fn write_json_report(report: &Value, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_text(path, &serde_json::to_string_pretty(report)?)?;
    debug!("JSON report written to {}", path.display());
    Ok(())
}
