mod json;
mod markdown;
mod table;

pub use json::write_json_report;
pub use markdown::{render_markdown, write_markdown_report};
pub use table::{render_lines, ResultTableRow};

use std::fs;
use std::path::Path;
use crate::error::Result;

fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
