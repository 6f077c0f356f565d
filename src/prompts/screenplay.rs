//! Screenplay & edit prompt, built from the script and the footage inventory.

use super::{or_fallback, script_summary, truncate_chars, SCREENPLAY_CLIP_CHARS, SCREENPLAY_SCRIPT_CHARS};
use crate::project::FootageClip;
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct ScreenplayArgs {
    pub script: Value,
    pub footage: Vec<FootageClip>,
}

const SHAPE: &str = r#"{
  "screenplay_title": "Title",
  "total_runtime_estimate": "e.g., 22 minutes",
  "sequences": [
    {
      "sequence_number": 1,
      "sequence_title": "e.g., Cold Open",
      "duration_estimate": "e.g., 1:30",
      "cuts": [
        {
          "cut_number": "1.1",
          "type": "interview|broll|narration|title_card|montage|transition",
          "source_clip": "Which footage clip to use (by label)",
          "timecode_suggestion": "e.g., 03:42 - 04:15 (if known from notes)",
          "description": "What appears on screen",
          "audio": "What the viewer hears",
          "text_overlay": "Lower thirds, titles or text (null if none)",
          "transition": "Cut/dissolve/fade to next",
          "editing_notes": "Technical instructions for the editor"
        }
      ],
      "pacing_notes": "Feel and rhythm of this sequence",
      "music_cue": "Music direction for this sequence"
    }
  ],
  "color_grading_notes": "Overall color treatment",
  "sound_design_notes": "Overall sound mix",
  "graphics_needed": ["Graphics/animations to create"],
  "missing_footage_notes": ["Footage gaps that need to be shot"],
  "editor_summary": "A letter to the editor on the overall vision and feel"
}"#;

fn clip_summary(index: usize, clip: &FootageClip) -> String {
    format!(
        "CLIP {}: \"{}\" ({}, {})\nSubject: {}\nTranscript/Description: {}\nKey Notes: {}",
        index + 1,
        clip.label,
        clip.kind.as_str(),
        or_fallback(&clip.duration, "unknown duration"),
        or_fallback(&clip.subjects, "N/A"),
        or_fallback(truncate_chars(&clip.transcript, SCREENPLAY_CLIP_CHARS), "No transcript"),
        or_fallback(&clip.notes, "None"),
    )
}

pub fn screenplay_prompt(args: &ScreenplayArgs) -> String {
    let footage = args
        .footage
        .iter()
        .enumerate()
        .map(|(i, clip)| clip_summary(i, clip))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are an expert documentary editor and screenplay writer. Using the documentary structure and the \
available footage below, write a detailed screenplay with editing instructions.\n\n\
DOCUMENTARY SCRIPT STRUCTURE:\n{script}\n\n\
AVAILABLE FOOTAGE:\n{footage}\n\n\
Answer with the screenplay in exactly this JSON format and nothing else (no markdown, no backticks):\n{shape}",
        script = script_summary(&args.script, SCREENPLAY_SCRIPT_CHARS),
        footage = footage,
        shape = SHAPE
    )
}
