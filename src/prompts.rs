//! Prompt builders
//!
//! Pure functions from project data to the prompt text sent to the model. Each
//! prompt ends with the JSON shape the model must answer in; the exporters read the
//! same field names back.

mod editor_cut;
mod screenplay;
mod script;
mod transcript_script;

pub use editor_cut::{editor_cut_prompt, EditorCutArgs};
pub use screenplay::{screenplay_prompt, ScreenplayArgs};
pub use script::script_prompt;
pub use transcript_script::{transcript_script_prompt, TranscriptScriptArgs};

use crate::extract::truncate_chars;
use crate::project::Transcript;
use serde_json::Value;

/// Per-transcript budget for the transcript-driven script.
pub const SCRIPT_TRANSCRIPT_CHARS: usize = 6000;
/// Per-transcript budget for the editor's cut.
pub const EDITOR_CUT_TRANSCRIPT_CHARS: usize = 5000;
/// Script summary budget for the editor's cut.
pub const EDITOR_CUT_SCRIPT_CHARS: usize = 6000;
/// Script summary budget for the screenplay.
pub const SCREENPLAY_SCRIPT_CHARS: usize = 4000;
/// Per-clip transcript budget for the screenplay.
pub const SCREENPLAY_CLIP_CHARS: usize = 2000;

/// `value` unless it is blank.
fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn transcript_block(transcripts: &[Transcript], max_chars: usize) -> String {
    transcripts
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let name = t.name.to_uppercase();
            format!(
                "--- TRANSCRIPT {}: {} ---\n{}\n--- END {} ---",
                i + 1,
                name,
                truncate_chars(&t.transcript, max_chars),
                name
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Pretty-printed script, cut to `max_chars`.
fn script_summary(script: &Value, max_chars: usize) -> String {
    let pretty = serde_json::to_string_pretty(script).unwrap_or_else(|_| script.to_string());
    truncate_chars(&pretty, max_chars).to_string()
}
