//! Editor's cut prompt: a cut-by-cut edit plan from the script and transcripts.

use super::{
    or_fallback, script_summary, transcript_block, EDITOR_CUT_SCRIPT_CHARS,
    EDITOR_CUT_TRANSCRIPT_CHARS,
};
use crate::project::{StoryBrief, Transcript};
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct EditorCutArgs {
    pub script: Value,
    pub transcripts: Vec<Transcript>,
    pub brief: StoryBrief,
}

const TASK: &str = "YOUR TASK:

Write a cut-by-cut editing plan. For EVERY cut give:
1. The exact source: which interview clip and an estimated timecode
2. What appears on screen
3. What the viewer hears (dialogue, music, ambience)
4. Text overlays: lower thirds, titles, captions with exact text, style, position and timing
5. Graphics and animations needed
6. Transitions in and out
7. Technical notes: speed changes, color treatment, split screen, picture-in-picture

TIMECODE ESTIMATION:
- Every transcript starts at 00:00
- Assume about 150 words per minute of speech
- Place a quote by counting the words before it
- Format timecodes as MM:SS or HH:MM:SS";

const SHAPE: &str = r#"{
  "editor_cut_title": "Title - Editor's Cut",
  "version": "Editor's Cut v1",
  "total_runtime_estimate": "e.g., 25 minutes",
  "editor_letter": "A detailed letter to the editor on vision, pacing, emotional arc and priorities",
  "sequences": [
    {
      "sequence_number": 1,
      "sequence_title": "e.g., Cold Open",
      "duration_estimate": "e.g., 1:30",
      "purpose": "Why this sequence exists and what the viewer should feel",
      "music_cue": {
        "track_description": "Mood, instruments, tempo",
        "entry_point": "When the music starts",
        "dynamics": "How the music evolves through the sequence"
      },
      "cuts": [
        {
          "cut_number": "1.1",
          "type": "interview|broll|narration|title_card|montage|transition|screen_recording",
          "source": "Which transcript/person this comes from",
          "timecode_in": "e.g., 04:22",
          "timecode_out": "e.g., 04:45",
          "duration": "e.g., 23s",
          "description": "What appears on screen, framing and angle",
          "audio": "What the viewer hears",
          "text_overlay": {
            "type": "lower_third|title_card|caption|subtitle|stat|quote_card",
            "text": "Exact text to display (null if none)",
            "position": "e.g., bottom-left",
            "style": "e.g., clean white sans-serif",
            "timing": "When it appears and disappears"
          },
          "graphics": {
            "needed": true,
            "type": "e.g., animated_stat|logo_animation|icon_overlay|data_viz|illustration",
            "description": "What the graphic looks like and does",
            "timing": "When it appears in the cut"
          },
          "transition_in": "e.g., hard cut",
          "transition_out": "e.g., 0.5s dissolve",
          "editing_notes": "Speed ramps, color shift, split screen, zoom, etc."
        }
      ],
      "pacing_notes": "Overall rhythm and feel for this sequence"
    }
  ],
  "post_production": {
    "color_grading": {
      "overall_look": "The overall look",
      "per_type_treatment": {
        "interviews": "Treatment for interview clips",
        "broll": "Treatment for b-roll",
        "screen_recordings": "Treatment for screen recordings"
      }
    },
    "sound_design": {
      "overall_mix": "Dialogue levels and music balance",
      "ambient_beds": "Background ambience",
      "sound_effects": ["Specific sound effects and where"],
      "music_notes": "Final music mixing notes"
    },
    "graphics_package": [
      {
        "item": "Name/type of graphic",
        "description": "Look, colors, animation style",
        "where_used": "Which cuts use it",
        "priority": "essential|nice_to_have"
      }
    ],
    "title_sequence": {"style": "Opening title style", "text": "Exact title text", "duration": "Length"},
    "end_credits": {"style": "Credits style", "content": "What the credits include"}
  },
  "missing_footage": [
    {"description": "What's missing", "priority": "critical|important|nice_to_have", "suggestion": "How to get it or what to use instead"}
  ],
  "delivery_specs": {
    "aspect_ratio": "16:9",
    "resolution": "4K or 1080p",
    "frame_rate": "24fps",
    "audio_format": "Stereo mix + separate dialogue/music/sfx stems"
  }
}"#;

pub fn editor_cut_prompt(args: &EditorCutArgs) -> String {
    let brief = &args.brief;
    format!(
        "You are an expert documentary editor who writes detailed, editor-friendly edit decision lists. \
You have a documentary script and the original interview transcripts. Produce an editing document that makes \
assembling the final cut straightforward.\n\n\
DOCUMENTARY SCRIPT:\n{script}\n\n\
ORIGINAL TRANSCRIPTS (for timecode reference; estimate timecodes from word position at ~150 words per minute):\n{transcripts}\n\n\
DIRECTOR'S BRIEF:\n\
- Title: {title}\n\
- Tone: {tone}\n\
- Duration: {duration}\n\n\
{task}\n\n\
Respond ONLY with valid JSON in exactly this format (no markdown, no backticks):\n{shape}",
        script = script_summary(&args.script, EDITOR_CUT_SCRIPT_CHARS),
        transcripts = transcript_block(&args.transcripts, EDITOR_CUT_TRANSCRIPT_CHARS),
        title = or_fallback(&brief.title, "Untitled Documentary"),
        tone = or_fallback(&brief.tone, "Mix of raw honesty and inspiration"),
        duration = or_fallback(&brief.duration, "20-30 minutes"),
        task = TASK,
        shape = SHAPE
    )
}
