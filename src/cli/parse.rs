//! CLI parse: clap types for Tarantino. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Tarantino CLI - documentary writing wizard backed by a text-generation model
#[derive(Parser)]
#[command(name = "tarantino")]
#[command(about = "Turn story answers, transcripts and footage notes into documentary scripts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Artifacts the model can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenerateTarget {
    /// Script & structure from the story questionnaire
    Script,
    /// Documentary script found in the interview transcripts
    TranscriptScript,
    /// Cut-by-cut edit plan from the transcript script
    EditorCut,
    /// Screenplay & edit instructions from the script and footage
    Screenplay,
}

/// Artifacts that can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportTarget {
    Script,
    EditorCut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    /// Markdown (.md)
    #[default]
    Md,
    /// Word-compatible HTML (.doc)
    Doc,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Md => "md",
            ExportFormat::Doc => "doc",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default workspace config (config/config.toml)
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Show current phase, completed phases and stored slots
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Answer the story questionnaire (interactive without flags)
    Answer {
        /// Question id, e.g. title or key_moments
        #[arg(long, requires = "value")]
        question: Option<String>,
        /// Answer text; empty clears the answer
        #[arg(long, requires = "question")]
        value: Option<String>,
    },
    /// Update the director's brief used for transcript-driven scripts
    Brief {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        direction: Option<String>,
        #[arg(long)]
        tone: Option<String>,
        #[arg(long)]
        duration: Option<String>,
        /// Additional notes for the writer
        #[arg(long)]
        notes: Option<String>,
    },
    /// Store a JSON document in a slot
    Set {
        /// Slot name (e.g. script, editor-cut, story-brief)
        slot: String,
        /// JSON file to read; the extractor is applied, so fenced or prose-wrapped JSON works
        #[arg(long)]
        file: PathBuf,
    },
    /// Print the JSON stored in a slot
    Show {
        slot: String,
    },
    /// Remove a slot
    Clear {
        slot: String,
    },
    /// Add an interview transcript from a text file
    AddTranscript {
        #[arg(long)]
        file: PathBuf,
        /// Display name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Add a clip to the footage inventory
    AddClip {
        #[arg(long)]
        label: String,
        /// interview, broll, voiceover, event or screen
        #[arg(long, default_value = "interview")]
        kind: String,
        #[arg(long)]
        duration: Option<String>,
        /// Interview subject(s)
        #[arg(long)]
        subjects: Option<String>,
        /// Text file with the clip transcript or description
        #[arg(long)]
        transcript_file: Option<PathBuf>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Generate an artifact (reuses the stored one unless --force)
    Generate {
        #[arg(value_enum)]
        target: GenerateTarget,
        /// Regenerate even if a result is already stored
        #[arg(long)]
        force: bool,
        /// Print the generated JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Recover JSON from a saved model response
    Extract {
        file: PathBuf,
    },
    /// Export an artifact as markdown or a Word document
    Export {
        #[arg(value_enum)]
        target: ExportTarget,
        #[arg(long, value_enum, default_value_t = ExportFormat::Md)]
        format: ExportFormat,
        /// Output path (defaults to <title>_<kind>.<md|doc> in the workspace)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Mark a phase complete and advance to the next one
    Complete {
        /// story-development, script-generation, footage-review or screenplay-edit
        phase: String,
    },
    /// Clear every slot and start over
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}
