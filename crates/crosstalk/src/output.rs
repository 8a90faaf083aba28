//! Aggregation rendering: aligned text or JSON.
//!
//! Response order is preserved exactly as collected — arrival order is
//! information ("who answered fastest"), not noise to be sorted away.

use std::io::IsTerminal;

use owo_colors::OwoColorize;
use serde_json::json;
use tabled::{Table, Tabled, settings::Style};

use crosstalk_core::{Response, ResultValue};

use crate::cli::{ColorMode, OutputFormat};

/// Width the bracketed `[name verb …]` prefix is padded to before the
/// payload column.
const PREFIX_WIDTH: usize = 24;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub color: bool,
}

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err()
        }
    }
}

/// Render one closed collection in the chosen format.
pub fn render_aggregation(responses: &[Response], opts: RenderOptions) -> String {
    match opts.format {
        OutputFormat::Text => render_text(responses, opts.color),
        OutputFormat::Json => render_json(responses),
    }
}

// ── Text ────────────────────────────────────────────────────────────

fn render_text(responses: &[Response], color: bool) -> String {
    if responses.is_empty() {
        return "\t(no replies)".to_owned();
    }
    responses
        .iter()
        .map(|response| render_response(response, color))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_response(response: &Response, color: bool) -> String {
    let mut prefix = format!("[{}", response.from.name());
    prefix.push(' ');
    prefix.push_str(&response.verb.word().to_string());
    if let Some(arg) = response.verb.arg() {
        prefix.push(' ');
        prefix.push_str(&arg);
    }
    prefix.push(']');
    let padded = format!("\t{prefix:<PREFIX_WIDTH$}");
    let padded = if color {
        padded.cyan().to_string()
    } else {
        padded
    };

    match &response.result {
        ResultValue::Ack => {
            let ack = if color {
                "ROGER".green().to_string()
            } else {
                "ROGER".to_owned()
            };
            format!("{padded}\t{ack}")
        }
        ResultValue::Text(text) => format!("{padded}\t{text}"),
        ResultValue::Error(reason) => {
            let tag = if color {
                "ERROR".red().to_string()
            } else {
                "ERROR".to_owned()
            };
            format!("{padded}\t{tag}  {reason}")
        }
        ResultValue::Entries(entries) => {
            let rows: Vec<EntryRow> = entries.iter().map(EntryRow::from).collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            format!("{padded}\n{table}")
        }
    }
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&crosstalk_core::ManifestoEntry> for EntryRow {
    fn from(entry: &crosstalk_core::ManifestoEntry) -> Self {
        Self {
            kind: entry.kind.to_string(),
            name: entry.name.clone(),
            description: entry.description.clone(),
        }
    }
}

// ── JSON ────────────────────────────────────────────────────────────

fn render_json(responses: &[Response]) -> String {
    let values: Vec<serde_json::Value> = responses.iter().map(response_json).collect();
    serde_json::to_string_pretty(&values).expect("serialization should not fail")
}

fn response_json(response: &Response) -> serde_json::Value {
    let result = match &response.result {
        ResultValue::Ack => json!("ROGER"),
        ResultValue::Text(text) => json!(text),
        ResultValue::Error(reason) => json!({ "error": reason }),
        ResultValue::Entries(entries) => {
            serde_json::to_value(entries).expect("serialization should not fail")
        }
    };
    json!({
        "from": response.from.name(),
        "channel": response.from.channel(),
        "verb": response.verb.word().to_string(),
        "arg": response.verb.arg(),
        "result": result,
    })
}
