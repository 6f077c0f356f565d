//! Script & structure prompt, built from the story questionnaire.

use super::or_fallback;
use crate::project::StoryAnswers;

const SCRIPT_SHAPE: &str = r#"{
  "title": "Final documentary title",
  "logline": "Refined one-line logline",
  "total_duration_estimate": "e.g., 25-30 minutes",
  "acts": [
    {
      "act_number": 1,
      "act_title": "e.g., The Wake-Up Call",
      "duration_estimate": "e.g., 5-7 min",
      "purpose": "What this act accomplishes narratively",
      "scenes": [
        {
          "scene_number": "1.1",
          "scene_title": "Opening",
          "description": "What happens in this scene",
          "interview_subjects": ["Who speaks here"],
          "sample_interview_questions": ["What questions to ask"],
          "b_roll_suggestions": ["What visuals to capture"],
          "mood": "The emotional tone",
          "narration_notes": "Any voiceover or text overlay suggestions"
        }
      ]
    }
  ],
  "interview_guide": [
    {
      "subject": "Person name/role",
      "focus_areas": ["What to explore with them"],
      "key_questions": ["Specific questions to ask"],
      "emotional_beats": "What emotion to draw out"
    }
  ],
  "music_and_sound_notes": "Overall audio direction",
  "visual_style_guide": "Specific visual guidelines",
  "opening_hook": "How the first 30 seconds should look/feel",
  "closing_image": "How the documentary should end"
}"#;

/// (question id, brief label, fallback)
const BRIEF_LINES: [(&str, &str, &str); 15] = [
    ("title", "Title", "Untitled"),
    ("logline", "Logline", "Not provided"),
    ("core_question", "Central Question", "Not provided"),
    ("audience", "Target Audience", "General"),
    ("tone", "Tone", "Not specified"),
    ("duration", "Duration", "Medium"),
    ("key_characters", "Key Characters", "Not provided"),
    ("story_arc", "Story Arc", "Not provided"),
    ("key_moments", "Key Moments", "Not provided"),
    ("conflict", "Conflict/Tension", "Not provided"),
    ("visual_style", "Visual Style", "Not specified"),
    ("interviews_planned", "Interviews Planned", "Not specified"),
    ("b_roll", "B-Roll Plans", "Not specified"),
    ("desired_outcome", "Desired Outcome", "Not specified"),
    ("distribution", "Distribution", "Not specified"),
];

pub fn script_prompt(answers: &StoryAnswers) -> String {
    let brief = BRIEF_LINES
        .iter()
        .map(|(id, label, fallback)| {
            let answer = answers.get(*id).map(String::as_str).unwrap_or("");
            format!("- {}: {}", label, or_fallback(answer, fallback))
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert documentary filmmaker and screenwriter. Using the director's story brief below, \
create a detailed documentary script and structure.\n\n\
STORY BRIEF:\n{brief}\n\n\
Answer with the documentary structure in exactly this JSON format and nothing else \
(no markdown, no backticks, no preamble):\n{shape}",
        brief = brief,
        shape = SCRIPT_SHAPE
    )
}
