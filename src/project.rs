//! Documentary project state
//!
//! Typed access to the wizard slots held in a [`PhaseStore`]: story answers,
//! transcripts, footage inventory, generated artifacts, and phase progress.

use crate::error::StorageError;
use crate::store::{load_typed, save_typed, PhaseStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Answers to the story questionnaire, keyed by question id.
pub type StoryAnswers = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Text,
    Textarea,
    Select,
}

#[derive(Debug, Clone, Copy)]
pub struct StoryQuestion {
    pub id: &'static str,
    pub question: &'static str,
    pub placeholder: Option<&'static str>,
    pub kind: QuestionKind,
    pub options: &'static [&'static str],
}

const fn free_text(
    id: &'static str,
    question: &'static str,
    placeholder: &'static str,
    kind: QuestionKind,
) -> StoryQuestion {
    StoryQuestion {
        id,
        question,
        placeholder: Some(placeholder),
        kind,
        options: &[],
    }
}

const fn select(
    id: &'static str,
    question: &'static str,
    options: &'static [&'static str],
) -> StoryQuestion {
    StoryQuestion {
        id,
        question,
        placeholder: None,
        kind: QuestionKind::Select,
        options,
    }
}

pub const STORY_QUESTIONS: [StoryQuestion; 15] = [
    free_text(
        "title",
        "What's the working title of this documentary?",
        "e.g., 'The 45-Day Transformation'",
        QuestionKind::Text,
    ),
    free_text(
        "logline",
        "In one sentence, what is this documentary about? (The logline)",
        "e.g., A small company bets everything on an internal bootcamp to retrain its team.",
        QuestionKind::Textarea,
    ),
    free_text(
        "core_question",
        "What's the central question or tension this documentary explores?",
        "e.g., Can a non-technical team genuinely transform in just 45 days?",
        QuestionKind::Textarea,
    ),
    free_text(
        "audience",
        "Who is the primary audience for this documentary?",
        "e.g., Founders, small business owners, people curious about AI adoption",
        QuestionKind::Text,
    ),
    select(
        "tone",
        "What tone/mood are you going for?",
        &[
            "Inspirational & uplifting",
            "Raw & honest (warts and all)",
            "Cinematic & dramatic",
            "Casual & behind-the-scenes",
            "Educational & informative",
            "Mix of raw honesty + inspiration",
        ],
    ),
    select(
        "duration",
        "Target duration?",
        &[
            "Short-form (5-10 min)",
            "Medium (15-25 min)",
            "Feature-length (30-60 min)",
            "Series (multiple episodes)",
        ],
    ),
    free_text(
        "key_characters",
        "Who are the key people/characters in this story? List them with their roles.",
        "e.g., the founder driving the vision, team members going through the program",
        QuestionKind::Textarea,
    ),
    free_text(
        "story_arc",
        "What's the journey? Describe the beginning, middle, and end you envision.",
        "Beginning: the decision and the why. Middle: struggle and breakthroughs. End: what changed.",
        QuestionKind::Textarea,
    ),
    free_text(
        "key_moments",
        "What are the 3-5 KEY moments or scenes you absolutely want to capture?",
        "e.g., the announcement meeting, a breakthrough moment, the final demo day",
        QuestionKind::Textarea,
    ),
    free_text(
        "conflict",
        "Every good documentary has tension. What are the challenges, doubts, or conflicts?",
        "e.g., skepticism, time pressure, balancing daily work with learning",
        QuestionKind::Textarea,
    ),
    free_text(
        "visual_style",
        "What visual references or style inspire you?",
        "e.g., intimate interview style, talking heads + b-roll",
        QuestionKind::Textarea,
    ),
    free_text(
        "interviews_planned",
        "How many interviews are you planning? Who will be interviewed?",
        "e.g., 8-10 interviews: founder, co-founder, five team members, two trainers",
        QuestionKind::Textarea,
    ),
    free_text(
        "b_roll",
        "What B-roll footage do you plan to capture or already have?",
        "e.g., office shots, screen recordings, whiteboard sessions",
        QuestionKind::Textarea,
    ),
    free_text(
        "desired_outcome",
        "After watching this documentary, what should the viewer FEEL and DO?",
        "e.g., feel that small teams can embrace AI and try something similar",
        QuestionKind::Textarea,
    ),
    select(
        "distribution",
        "Where will this be published?",
        &[
            "YouTube (public)",
            "YouTube (unlisted/private)",
            "Internal only",
            "Social media clips + full version",
            "Film festivals / competitions",
            "Multiple platforms",
        ],
    ),
];

pub fn find_question(id: &str) -> Option<&'static StoryQuestion> {
    STORY_QUESTIONS.iter().find(|q| q.id == id)
}

/// One interview transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub name: String,
    pub transcript: String,
}

impl Transcript {
    /// Name a transcript after its file: extension dropped, `_`/`-` become spaces.
    pub fn from_file_name(file_name: &str, transcript: impl Into<String>) -> Self {
        let cut = file_name.len().saturating_sub(4);
        let stem = match file_name.get(cut..) {
            Some(ext) if ext.eq_ignore_ascii_case(".txt") => &file_name[..cut],
            _ => file_name,
        };
        Self {
            name: stem.replace(['_', '-'], " "),
            transcript: transcript.into(),
        }
    }
}

/// Director's brief for transcript-driven scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoryBrief {
    pub title: String,
    pub direction: String,
    pub tone: String,
    pub duration: String,
    pub additional_notes: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    #[default]
    Interview,
    Broll,
    Voiceover,
    Event,
    Screen,
}

impl ClipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClipKind::Interview => "interview",
            ClipKind::Broll => "broll",
            ClipKind::Voiceover => "voiceover",
            ClipKind::Event => "event",
            ClipKind::Screen => "screen",
        }
    }
}

impl FromStr for ClipKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "interview" => Ok(ClipKind::Interview),
            "broll" | "b-roll" => Ok(ClipKind::Broll),
            "voiceover" => Ok(ClipKind::Voiceover),
            "event" => Ok(ClipKind::Event),
            "screen" => Ok(ClipKind::Screen),
            other => Err(format!("Unknown clip type: {}", other)),
        }
    }
}

/// One entry of the footage inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootageClip {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ClipKind,
    pub duration: String,
    pub subjects: String,
    pub transcript: String,
    pub notes: String,
}

/// Wizard phases, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    StoryDevelopment,
    ScriptGeneration,
    FootageReview,
    ScreenplayEdit,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::StoryDevelopment,
        Phase::ScriptGeneration,
        Phase::FootageReview,
        Phase::ScreenplayEdit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::StoryDevelopment => "story_development",
            Phase::ScriptGeneration => "script_generation",
            Phase::FootageReview => "footage_review",
            Phase::ScreenplayEdit => "screenplay_edit",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Phase::StoryDevelopment => "Story Development",
            Phase::ScriptGeneration => "Script Generation",
            Phase::FootageReview => "Footage Review",
            Phase::ScreenplayEdit => "Screenplay & Edit",
        }
    }

    /// The phase after this one; the last phase has none.
    pub fn next(&self) -> Option<Phase> {
        match self {
            Phase::StoryDevelopment => Some(Phase::ScriptGeneration),
            Phase::ScriptGeneration => Some(Phase::FootageReview),
            Phase::FootageReview => Some(Phase::ScreenplayEdit),
            Phase::ScreenplayEdit => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_").to_lowercase();
        Phase::ALL
            .into_iter()
            .find(|phase| phase.as_str() == normalized)
            .ok_or_else(|| format!("Unknown phase: {}", s))
    }
}

/// Named slots in the phase store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Phase,
    CompletedPhases,
    Answers,
    Script,
    Footage,
    Screenplay,
    Transcripts,
    StoryBrief,
    TranscriptScript,
    EditorCut,
}

impl Slot {
    pub const ALL: [Slot; 10] = [
        Slot::Phase,
        Slot::CompletedPhases,
        Slot::Answers,
        Slot::Script,
        Slot::Footage,
        Slot::Screenplay,
        Slot::Transcripts,
        Slot::StoryBrief,
        Slot::TranscriptScript,
        Slot::EditorCut,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Slot::Phase => "phase",
            Slot::CompletedPhases => "completedPhases",
            Slot::Answers => "answers",
            Slot::Script => "script",
            Slot::Footage => "footage",
            Slot::Screenplay => "screenplay",
            Slot::Transcripts => "transcripts",
            Slot::StoryBrief => "storyBrief",
            Slot::TranscriptScript => "transcriptScript",
            Slot::EditorCut => "editorCut",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Slot {
    type Err = String;

    /// Accepts the stored key (`editorCut`) or a kebab/snake spelling (`editor-cut`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        Slot::ALL
            .into_iter()
            .find(|slot| slot.key().to_lowercase() == wanted)
            .ok_or_else(|| format!("Unknown slot: {}", s))
    }
}

/// Typed view over a project's slots.
#[derive(Clone)]
pub struct Project {
    store: Arc<dyn PhaseStore>,
}

impl Project {
    pub fn new(store: Arc<dyn PhaseStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<dyn PhaseStore> {
        self.store.clone()
    }

    pub fn raw(&self, slot: Slot) -> Result<Option<Value>, StorageError> {
        self.store.get(slot.key())
    }

    pub fn set_raw(&self, slot: Slot, value: &Value) -> Result<(), StorageError> {
        self.store.set(slot.key(), value)
    }

    pub fn clear(&self, slot: Slot) -> Result<(), StorageError> {
        self.store.remove(slot.key())
    }

    pub fn phase(&self) -> Result<Phase, StorageError> {
        Ok(load_typed(self.store.as_ref(), Slot::Phase.key())?.unwrap_or(Phase::StoryDevelopment))
    }

    pub fn set_phase(&self, phase: Phase) -> Result<(), StorageError> {
        save_typed(self.store.as_ref(), Slot::Phase.key(), &phase)
    }

    pub fn completed_phases(&self) -> Result<Vec<Phase>, StorageError> {
        Ok(load_typed(self.store.as_ref(), Slot::CompletedPhases.key())?.unwrap_or_default())
    }

    /// Mark `phase` complete (once) and move to the next phase. Returns the new current phase.
    pub fn complete_phase(&self, phase: Phase) -> Result<Phase, StorageError> {
        let mut completed = self.completed_phases()?;
        if !completed.contains(&phase) {
            completed.push(phase);
            save_typed(self.store.as_ref(), Slot::CompletedPhases.key(), &completed)?;
        }
        let current = phase.next().unwrap_or(phase);
        self.set_phase(current)?;
        info!(completed = %phase, current = %current, "Phase completed");
        Ok(current)
    }

    /// Clear every project slot and return to the first phase.
    pub fn reset(&self) -> Result<(), StorageError> {
        for slot in Slot::ALL {
            self.store.remove(slot.key())?;
        }
        self.set_phase(Phase::StoryDevelopment)?;
        info!("Project reset");
        Ok(())
    }

    pub fn answers(&self) -> Result<StoryAnswers, StorageError> {
        Ok(load_typed(self.store.as_ref(), Slot::Answers.key())?.unwrap_or_default())
    }

    pub fn set_answer(&self, question_id: &str, answer: &str) -> Result<(), StorageError> {
        let mut answers = self.answers()?;
        if answer.trim().is_empty() {
            answers.remove(question_id);
        } else {
            answers.insert(question_id.to_string(), answer.to_string());
        }
        save_typed(self.store.as_ref(), Slot::Answers.key(), &answers)
    }

    pub fn transcripts(&self) -> Result<Vec<Transcript>, StorageError> {
        Ok(load_typed(self.store.as_ref(), Slot::Transcripts.key())?.unwrap_or_default())
    }

    pub fn add_transcript(&self, transcript: Transcript) -> Result<usize, StorageError> {
        let mut transcripts = self.transcripts()?;
        transcripts.push(transcript);
        save_typed(self.store.as_ref(), Slot::Transcripts.key(), &transcripts)?;
        Ok(transcripts.len())
    }

    pub fn story_brief(&self) -> Result<StoryBrief, StorageError> {
        Ok(load_typed(self.store.as_ref(), Slot::StoryBrief.key())?.unwrap_or_default())
    }

    pub fn set_story_brief(&self, brief: &StoryBrief) -> Result<(), StorageError> {
        save_typed(self.store.as_ref(), Slot::StoryBrief.key(), brief)
    }

    pub fn footage(&self) -> Result<Vec<FootageClip>, StorageError> {
        Ok(load_typed(self.store.as_ref(), Slot::Footage.key())?.unwrap_or_default())
    }

    pub fn add_clip(&self, clip: FootageClip) -> Result<usize, StorageError> {
        let mut footage = self.footage()?;
        footage.push(clip);
        save_typed(self.store.as_ref(), Slot::Footage.key(), &footage)?;
        Ok(footage.len())
    }
}
