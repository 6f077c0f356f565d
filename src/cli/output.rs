//! CLI output: error mapping and text presentation.

use crate::error::{ApiError, GenerationError};
use crate::project::{Phase, Slot};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Generation(GenerationError::Configuration(msg)) => {
            format!("Configuration error: {}", msg)
        }
        ApiError::Generation(err) if err.is_retryable() => {
            format!("{}\nRun the command again with --force to retry.", err)
        }
        other => other.to_string(),
    }
}

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// One row of the slot table.
#[derive(Debug, Clone, Serialize)]
pub struct SlotSummary {
    pub slot: String,
    pub stored: bool,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectStatus {
    pub workspace: String,
    pub model: String,
    pub credential: bool,
    pub phase: Phase,
    pub completed_phases: Vec<Phase>,
    pub slots: Vec<SlotSummary>,
}

/// Short description of a stored value for the status table.
pub fn summarize_value(value: &serde_json::Value) -> String {
    use serde_json::Value;
    for key in ["title", "editor_cut_title", "screenplay_title"] {
        if let Some(title) = value.get(key).and_then(Value::as_str) {
            return format!("\"{}\"", title);
        }
    }
    match value {
        Value::Array(items) => format!("{} item(s)", items.len()),
        Value::Object(map) => format!("{} field(s)", map.len()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn format_status_text(status: &ProjectStatus) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Project Status")));
    out.push_str(&format!("  Workspace: {}\n", status.workspace));
    out.push_str(&format!("  Model: {}\n", status.model));
    let credential = if status.credential {
        format!("{}", "configured".green())
    } else {
        format!("{}", "missing".red())
    };
    out.push_str(&format!("  Credential: {}\n\n", credential));

    out.push_str(&format!("{}\n\n", format_section_heading("Phases")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Phase", "State"]);
    for phase in Phase::ALL {
        let state = if status.completed_phases.contains(&phase) {
            "completed"
        } else if phase == status.phase {
            "current"
        } else {
            "-"
        };
        table.add_row(vec![phase.title().to_string(), state.to_string()]);
    }
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!("{}\n\n", format_section_heading("Slots")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Slot", "Stored", "Summary"]);
    for row in &status.slots {
        table.add_row(vec![
            row.slot.clone(),
            if row.stored { "yes" } else { "no" }.to_string(),
            row.summary.clone(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn slot_names() -> String {
    Slot::ALL
        .iter()
        .map(|s| s.key())
        .collect::<Vec<_>>()
        .join(", ")
}
