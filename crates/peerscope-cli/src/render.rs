//! Rendering of a projected matrix view.
//!
//! Output formats:
//! - Self-contained HTML page with one selector per focus entity (no deps; works offline)
//! - JSON (header row plus every focus table, for custom frontends)

use anyhow::{anyhow, Result};
use peerscope_matrix::MatrixView;

pub const TITLE: &str = "Peering Locations and Relationships Inferred from Communities";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Html,
    Json,
}

impl TableFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(anyhow!("unknown table format `{other}` (expected html|json)")),
        }
    }
}

pub fn render(view: &MatrixView, format: TableFormat) -> Result<String> {
    match format {
        TableFormat::Html => render_html(view, TITLE),
        TableFormat::Json => render_json(view),
    }
}

pub fn render_json(view: &MatrixView) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

pub fn render_html(view: &MatrixView, title: &str) -> Result<String> {
    let json = script_safe(&serde_json::to_string(view)?);
    let template = include_str!("../templates/peering_table.html");
    let mut html = template.to_string();
    html = html.replace("{{TITLE}}", &html_escape(title));
    html = html.replace("{{MATRIX_JSON}}", &json);
    Ok(html)
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON embedded in a `<script>` element must not contain `</`.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
