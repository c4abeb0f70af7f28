use serde_json::Value;
use std::path::Path;
use tracing::debug;
use crate::check::plain_string;
use crate::error::Result;
use super::write_text;

/// Markdown rendering of a report document, results grouped by phase in
/// first-seen order.
pub fn render_markdown(report: &Value, title: &str) -> String {
    let summary = &report["summary"];
    let mut lines = vec![
        format!("# {}", title),
        String::new(),
        "## Summary".to_string(),
        format!(
            "- Exit code: {}",
            summary.get("exit_code").and_then(Value::as_i64).unwrap_or(1)
        ),
    ];

    if let Some(counts) = summary.get("counts_by_status").and_then(Value::as_object) {
        let rendered: Vec<String> = counts
            .iter()
            .map(|(status, n)| format!("{}={}", status, plain_string(n)))
            .collect();
        lines.push(format!("- Status counts: {}", rendered.join(", ")));
    }
    lines.push(String::new());
    lines.push("## Results".to_string());

    let mut groups: Vec<(String, Vec<&Value>)> = Vec::new();
    for item in report["results"].as_array().into_iter().flatten() {
        let phase = item.get("phase").and_then(Value::as_str).unwrap_or("other");
        match groups.iter_mut().find(|(p, _)| p == phase) {
            Some((_, items)) => items.push(item),
            None => groups.push((phase.to_string(), vec![item])),
        }
    }

    for (phase, items) in groups {
        lines.push(format!("### {}", phase));
        for item in items {
            lines.push(format!(
                "- **{}** `{}`: {}",
                field(item, "status"),
                field(item, "name"),
                field(item, "message")
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn field<'a>(item: &'a Value, key: &str) -> &'a str {
    item.get(key).and_then(Value::as_str).unwrap_or("")
}

pub fn write_markdown_report(report: &Value, title: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_text(path, &render_markdown(report, title))?;
    debug!("Markdown report written to {}", path.display());
    Ok(())
}
