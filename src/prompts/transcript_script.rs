//! Transcript-driven script prompt: find the story inside raw interviews.

use super::{or_fallback, transcript_block, SCRIPT_TRANSCRIPT_CHARS};
use crate::project::{StoryBrief, Transcript};

#[derive(Debug, Clone, Default)]
pub struct TranscriptScriptArgs {
    pub transcripts: Vec<Transcript>,
    pub brief: StoryBrief,
}

const TASK: &str = "YOUR TASK:

1. READ every transcript. They are raw speech-to-text with retakes, false starts and filler; pull out the real content.

2. FIND THE STORY ARC: the triggering event, rising action, complications, the turning point, and where things stand now.

3. SELECT THE BEST QUOTES for each person. Clean up disfluencies but keep the voice natural. Never invent quotes; use only what was said.

4. STRUCTURE INTO CHAPTERS as a screenplay-style documentary script:
   - a cold open that hooks the viewer within 60 seconds
   - 6-10 chapters, each with a clear purpose
   - scene headings (INT./EXT., location, time)
   - stage directions in [brackets]
   - dialogue attributed to speakers using their actual quotes
   - narrator voiceover (V.O.) to bridge sections
   - placeholders for screen recordings wherever someone mentions a tool they built

5. END WITH IMPACT. The closing should land emotionally.";

const SHAPE: &str = r#"{
  "title": "Documentary title",
  "subtitle": "A subtitle or tagline",
  "total_duration_estimate": "e.g., 25 minutes",
  "story_summary": "2-3 sentence summary of the story found in the transcripts",
  "characters": [
    {
      "name": "Person name",
      "role": "Their role/context (inferred from transcript)",
      "arc": "Their personal journey in 1 sentence",
      "best_quotes": ["Their top 2-3 most powerful quotes"]
    }
  ],
  "chapters": [
    {
      "chapter_number": 0,
      "chapter_title": "Cold Open",
      "purpose": "Why this chapter exists in the story",
      "duration_estimate": "e.g., 1:30",
      "beats": [
        {"type": "scene_heading", "content": "INT. LOCATION - TIME"},
        {"type": "direction", "content": "Stage direction describing visuals"},
        {"type": "dialogue", "speaker": "PERSON NAME", "content": "Their actual quote"},
        {"type": "narration", "content": "Narrator voiceover text"},
        {"type": "tool_demo", "tool_name": "Name of the tool", "description": "What to show in the screen recording"}
      ]
    }
  ],
  "production_notes": {
    "missing_footage": ["Things worth capturing that are not in the transcripts"],
    "music_direction": "Overall music/sound guidance",
    "visual_style": "How this should look and feel",
    "tools_to_demo": [
      {"tool_name": "Name", "built_by": "Person", "what_to_show": "Screen recording needed"}
    ],
    "additional_interviews_needed": ["People or topics needing more footage"],
    "editors_note": "A letter to the editor explaining vision and priorities"
  }
}"#;

pub fn transcript_script_prompt(args: &TranscriptScriptArgs) -> String {
    let brief = &args.brief;
    let mut brief_lines = vec![
        format!("- Working Title: {}", or_fallback(&brief.title, "Untitled Documentary")),
        format!(
            "- Story Direction: {}",
            or_fallback(&brief.direction, "Find the best story from the transcripts")
        ),
        format!(
            "- Tone: {}",
            or_fallback(&brief.tone, "Mix of raw honesty and inspiration")
        ),
        format!("- Target Duration: {}", or_fallback(&brief.duration, "20-30 minutes")),
    ];
    if !brief.additional_notes.trim().is_empty() {
        brief_lines.push(format!("- Additional Notes: {}", brief.additional_notes));
    }

    format!(
        "You are a world-class documentary filmmaker. You have raw interview transcripts from members of a team. \
Find the story hidden inside them and craft a professional documentary script.\n\n\
DIRECTOR'S BRIEF:\n{brief}\n\n\
RAW TRANSCRIPTS:\n{transcripts}\n\n\
{task}\n\n\
Respond ONLY with valid JSON in exactly this format (no markdown, no backticks, no preamble):\n{shape}",
        brief = brief_lines.join("\n"),
        transcripts = transcript_block(&args.transcripts, SCRIPT_TRANSCRIPT_CHARS),
        task = TASK,
        shape = SHAPE
    )
}
