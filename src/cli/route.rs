//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::cli::output::{format_status_text, slot_names, summarize_value, ProjectStatus, SlotSummary};
use crate::cli::parse::{Commands, ExportFormat, ExportTarget, GenerateTarget};
use crate::config::{ConfigLoader, TarantinoConfig};
use crate::error::{ApiError, StorageError};
use crate::export::{
    editor_cut_to_doc_html, editor_cut_to_markdown, export_filename, script_to_doc_html,
    script_to_markdown,
};
use crate::extract::extract_detailed;
use crate::lifecycle::{GenerationController, LifecycleStatus};
use crate::project::{
    find_question, ClipKind, FootageClip, Phase, Project, QuestionKind, Slot, Transcript,
    STORY_QUESTIONS,
};
use crate::prompts::{
    editor_cut_prompt, screenplay_prompt, script_prompt, transcript_script_prompt, EditorCutArgs,
    ScreenplayArgs, TranscriptScriptArgs,
};
use crate::provider::{GenerationClient, Generator};
use crate::store::{PhaseStore, SledPhaseStore};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Minimum number of transcripts for a transcript-driven script
const MIN_TRANSCRIPTS: usize = 2;

/// Runtime context for CLI execution: workspace, config, phase store and generator.
pub struct RunContext {
    workspace_root: PathBuf,
    config: TarantinoConfig,
    project: Project,
    generator: Arc<dyn Generator>,
    credential: bool,
    runtime: tokio::runtime::Runtime,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };

        let store_path = config.storage.resolve_store_path(&workspace_root);
        std::fs::create_dir_all(&store_path).map_err(StorageError::IoError)?;
        let store: Arc<dyn PhaseStore> = Arc::new(SledPhaseStore::new(&store_path)?);

        let client = GenerationClient::from_config(&config.provider)?;
        let credential = client.has_credential();
        debug!(
            store = %store_path.display(),
            model = client.model_name(),
            credential,
            "Run context ready"
        );

        Self::with_parts(workspace_root, config, store, Arc::new(client), credential)
    }

    /// Assemble a context from already-built parts.
    pub fn with_parts(
        workspace_root: PathBuf,
        config: TarantinoConfig,
        store: Arc<dyn PhaseStore>,
        generator: Arc<dyn Generator>,
        credential: bool,
    ) -> Result<Self, ApiError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to start async runtime: {}", e)))?;

        Ok(Self {
            workspace_root,
            config,
            project: Project::new(store),
            generator,
            credential,
            runtime,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Init { force } => self.handle_init(*force),
            Commands::Status { format } => self.handle_status(format),
            Commands::Answer { question, value } => match (question, value) {
                (Some(question), Some(value)) => self.handle_answer(question, value),
                _ => self.handle_answer_interactive(),
            },
            Commands::Brief {
                title,
                direction,
                tone,
                duration,
                notes,
            } => self.handle_brief(
                title.as_deref(),
                direction.as_deref(),
                tone.as_deref(),
                duration.as_deref(),
                notes.as_deref(),
            ),
            Commands::Set { slot, file } => self.handle_set(slot, file),
            Commands::Show { slot } => self.handle_show(slot),
            Commands::Clear { slot } => {
                let slot = parse_slot(slot)?;
                self.project.clear(slot)?;
                Ok(format!("Cleared slot '{}'", slot))
            }
            Commands::AddTranscript { file, name } => {
                self.handle_add_transcript(file, name.as_deref())
            }
            Commands::AddClip {
                label,
                kind,
                duration,
                subjects,
                transcript_file,
                notes,
            } => {
                let clip = FootageClip {
                    id: clip_id(),
                    label: label.clone(),
                    kind: kind.parse::<ClipKind>().map_err(ApiError::InvalidInput)?,
                    duration: duration.clone().unwrap_or_default(),
                    subjects: subjects.clone().unwrap_or_default(),
                    transcript: match transcript_file {
                        Some(path) => read_text(path)?,
                        None => String::new(),
                    },
                    notes: notes.clone().unwrap_or_default(),
                };
                let count = self.project.add_clip(clip)?;
                Ok(format!("Added clip '{}' ({} clip(s) in inventory)", label, count))
            }
            Commands::Generate {
                target,
                force,
                json,
            } => self.handle_generate(*target, *force, *json),
            Commands::Extract { file } => self.handle_extract(file),
            Commands::Export {
                target,
                format,
                output,
            } => self.handle_export(*target, *format, output.as_deref()),
            Commands::Complete { phase } => {
                let phase: Phase = phase.parse().map_err(ApiError::InvalidInput)?;
                let current = self.project.complete_phase(phase)?;
                Ok(format!(
                    "Completed {}. Current phase: {}",
                    phase.title(),
                    current.title()
                ))
            }
            Commands::Reset { yes } => self.handle_reset(*yes),
        }
    }

    fn handle_init(&self, force: bool) -> Result<String, ApiError> {
        let path = crate::config::workspace_config_path(&self.workspace_root);
        if path.exists() && !force {
            return Ok(format!(
                "Config already exists at {} (use --force to overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, TarantinoConfig::default().to_toml()?)?;
        info!(path = %path.display(), "Wrote default config");
        Ok(format!("Wrote default config to {}", path.display()))
    }

    fn handle_status(&self, format: &str) -> Result<String, ApiError> {
        let slots = Slot::ALL
            .iter()
            .map(|slot| {
                let value = self.project.raw(*slot)?;
                Ok(SlotSummary {
                    slot: slot.key().to_string(),
                    stored: value.is_some(),
                    summary: value.as_ref().map(summarize_value).unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, StorageError>>()?;

        let status = ProjectStatus {
            workspace: self.workspace_root.display().to_string(),
            model: self.config.provider.model.clone(),
            credential: self.credential,
            phase: self.project.phase()?,
            completed_phases: self.project.completed_phases()?,
            slots,
        };

        match format {
            "json" => serde_json::to_string_pretty(&status)
                .map_err(|e| ApiError::InvalidInput(e.to_string())),
            "text" => Ok(format_status_text(&status)),
            other => Err(ApiError::InvalidInput(format!(
                "Unknown format '{}' (expected text or json)",
                other
            ))),
        }
    }

    fn handle_answer(&self, question: &str, value: &str) -> Result<String, ApiError> {
        let q = find_question(question).ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "Unknown question '{}'. Known ids: {}",
                question,
                STORY_QUESTIONS
                    .iter()
                    .map(|q| q.id)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;
        self.project.set_answer(q.id, value)?;
        Ok(format!("Saved answer for '{}'", q.id))
    }

    fn handle_answer_interactive(&self) -> Result<String, ApiError> {
        use dialoguer::{Input, Select};

        let mut answered = 0;
        for (index, question) in STORY_QUESTIONS.iter().enumerate() {
            let current = self.project.answers()?.get(question.id).cloned();
            let prompt = format!("[{}/{}] {}", index + 1, STORY_QUESTIONS.len(), question.question);

            let answer = match question.kind {
                QuestionKind::Select => {
                    let default = current
                        .as_deref()
                        .and_then(|c| question.options.iter().position(|o| *o == c))
                        .unwrap_or(0);
                    let choice = Select::new()
                        .with_prompt(prompt)
                        .items(question.options)
                        .default(default)
                        .interact()
                        .map_err(|e| {
                            ApiError::ConfigError(format!("Failed to get user input: {}", e))
                        })?;
                    question.options[choice].to_string()
                }
                QuestionKind::Text | QuestionKind::Textarea => {
                    if let Some(placeholder) = question.placeholder {
                        eprintln!("  {}", placeholder);
                    }
                    Input::<String>::new()
                        .with_prompt(prompt)
                        .with_initial_text(current.unwrap_or_default())
                        .allow_empty(true)
                        .interact_text()
                        .map_err(|e| {
                            ApiError::ConfigError(format!("Failed to get user input: {}", e))
                        })?
                }
            };

            self.project.set_answer(question.id, &answer)?;
            if !answer.trim().is_empty() {
                answered += 1;
            }
        }

        Ok(format!(
            "Story development saved ({} of {} questions answered)",
            answered,
            STORY_QUESTIONS.len()
        ))
    }

    fn handle_brief(
        &self,
        title: Option<&str>,
        direction: Option<&str>,
        tone: Option<&str>,
        duration: Option<&str>,
        notes: Option<&str>,
    ) -> Result<String, ApiError> {
        let mut brief = self.project.story_brief()?;
        let updates: [(&mut String, Option<&str>); 5] = [
            (&mut brief.title, title),
            (&mut brief.direction, direction),
            (&mut brief.tone, tone),
            (&mut brief.duration, duration),
            (&mut brief.additional_notes, notes),
        ];
        for (field, value) in updates {
            if let Some(value) = value {
                *field = value.trim().to_string();
            }
        }
        self.project.set_story_brief(&brief)?;
        serde_json::to_string_pretty(&brief).map_err(|e| ApiError::InvalidInput(e.to_string()))
    }

    fn handle_set(&self, slot: &str, file: &Path) -> Result<String, ApiError> {
        let slot = parse_slot(slot)?;
        let raw = read_text(file)?;
        let extraction = extract_detailed(&raw).ok_or_else(|| {
            ApiError::InvalidInput(format!("No JSON could be recovered from {}", file.display()))
        })?;
        self.project.set_raw(slot, &extraction.value)?;
        Ok(format!(
            "Stored {} in slot '{}' ({})",
            summarize_value(&extraction.value),
            slot,
            extraction.strategy.as_str()
        ))
    }

    fn handle_show(&self, slot: &str) -> Result<String, ApiError> {
        let slot = parse_slot(slot)?;
        let value = self
            .project
            .raw(slot)?
            .ok_or_else(|| ApiError::SlotEmpty(slot.key().to_string()))?;
        pretty(&value)
    }

    fn handle_add_transcript(&self, file: &Path, name: Option<&str>) -> Result<String, ApiError> {
        let text = read_text(file)?;
        if text.trim().is_empty() {
            return Err(ApiError::InvalidInput(format!(
                "Transcript file {} is empty",
                file.display()
            )));
        }
        let transcript = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => Transcript {
                name: name.to_string(),
                transcript: text.trim().to_string(),
            },
            None => {
                let file_name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "transcript".to_string());
                Transcript::from_file_name(&file_name, text.trim())
            }
        };
        let name = transcript.name.clone();
        let count = self.project.add_transcript(transcript)?;
        Ok(format!("Added transcript '{}' ({} total)", name, count))
    }

    fn handle_generate(
        &self,
        target: GenerateTarget,
        force: bool,
        json: bool,
    ) -> Result<String, ApiError> {
        let (slot, payload) = match target {
            GenerateTarget::Script => {
                let answers = self.project.answers()?;
                (Slot::Script, self.run_generation(Slot::Script, script_prompt, &answers, force)?)
            }
            GenerateTarget::TranscriptScript => {
                let transcripts = self.project.transcripts()?;
                let brief = self.project.story_brief()?;
                if transcripts.len() < MIN_TRANSCRIPTS {
                    return Err(ApiError::InvalidInput(format!(
                        "Add at least {} transcripts first (have {})",
                        MIN_TRANSCRIPTS,
                        transcripts.len()
                    )));
                }
                if brief.direction.trim().is_empty() {
                    return Err(ApiError::InvalidInput(
                        "Set a story direction first: tarantino brief --direction \"...\"".to_string(),
                    ));
                }
                let args = TranscriptScriptArgs { transcripts, brief };
                (
                    Slot::TranscriptScript,
                    self.run_generation(Slot::TranscriptScript, transcript_script_prompt, &args, force)?,
                )
            }
            GenerateTarget::EditorCut => {
                let script = self
                    .project
                    .raw(Slot::TranscriptScript)?
                    .ok_or_else(|| ApiError::SlotEmpty(Slot::TranscriptScript.key().to_string()))?;
                let args = EditorCutArgs {
                    script,
                    transcripts: self.project.transcripts()?,
                    brief: self.project.story_brief()?,
                };
                (
                    Slot::EditorCut,
                    self.run_generation(Slot::EditorCut, editor_cut_prompt, &args, force)?,
                )
            }
            GenerateTarget::Screenplay => {
                let script = self
                    .project
                    .raw(Slot::Script)?
                    .ok_or_else(|| ApiError::SlotEmpty(Slot::Script.key().to_string()))?;
                let args = ScreenplayArgs {
                    script,
                    footage: self.project.footage()?,
                };
                (
                    Slot::Screenplay,
                    self.run_generation(Slot::Screenplay, screenplay_prompt, &args, force)?,
                )
            }
        };

        if json {
            pretty(&payload)
        } else {
            Ok(format!(
                "Generated {} -> slot '{}' ({})",
                target_label(target),
                slot,
                summarize_value(&payload)
            ))
        }
    }

    /// Drive one controller bound to `slot` to completion.
    fn run_generation<A, F>(
        &self,
        slot: Slot,
        build_prompt: F,
        args: &A,
        force: bool,
    ) -> Result<Value, ApiError>
    where
        A: Sync + ?Sized,
        F: Fn(&A) -> String + Send + Sync + 'static,
    {
        let controller = GenerationController::new(self.generator.clone(), build_prompt)
            .with_max_output_tokens(self.config.provider.max_output_tokens)
            .with_slot(self.project.store(), slot.key());

        let mut states = controller.subscribe();
        let watcher = self.runtime.spawn(async move {
            while states.changed().await.is_ok() {
                let status = states.borrow_and_update().status;
                debug!(status = status.as_str(), "Generation state changed");
            }
        });

        let payload = self.runtime.block_on(async {
            if force {
                controller.generate(args).await
            } else {
                controller.ensure_generated(args).await
            }
        });
        watcher.abort();

        let state = controller.state();
        match (payload, state.status) {
            (Some(value), LifecycleStatus::Success) => Ok(value),
            _ => match controller.last_failure() {
                Some(err) => Err(ApiError::Generation(err)),
                None => Err(ApiError::GenerationFailed(
                    state
                        .last_error
                        .unwrap_or_else(|| "Generation failed. Please retry.".to_string()),
                )),
            },
        }
    }

    fn handle_extract(&self, file: &Path) -> Result<String, ApiError> {
        let raw = read_text(file)?;
        let extraction = extract_detailed(&raw).ok_or_else(|| {
            ApiError::InvalidInput(format!("No JSON could be recovered from {}", file.display()))
        })?;
        Ok(format!(
            "strategy: {}\n{}",
            extraction.strategy.as_str(),
            pretty(&extraction.value)?
        ))
    }

    fn handle_export(
        &self,
        target: ExportTarget,
        format: ExportFormat,
        output: Option<&Path>,
    ) -> Result<String, ApiError> {
        let (value, rendered, title_key, suffix) = match target {
            ExportTarget::Script => {
                let value = match self.project.raw(Slot::TranscriptScript)? {
                    Some(value) => value,
                    None => self
                        .project
                        .raw(Slot::Script)?
                        .ok_or_else(|| ApiError::SlotEmpty(Slot::TranscriptScript.key().to_string()))?,
                };
                let rendered = match format {
                    ExportFormat::Md => script_to_markdown(&value),
                    ExportFormat::Doc => script_to_doc_html(&value),
                };
                (value, rendered, "title", "script")
            }
            ExportTarget::EditorCut => {
                let value = self
                    .project
                    .raw(Slot::EditorCut)?
                    .ok_or_else(|| ApiError::SlotEmpty(Slot::EditorCut.key().to_string()))?;
                let rendered = match format {
                    ExportFormat::Md => editor_cut_to_markdown(&value),
                    ExportFormat::Doc => editor_cut_to_doc_html(&value),
                };
                (value, rendered, "editor_cut_title", "editors_cut")
            }
        };

        let path = match output {
            Some(path) => path.to_path_buf(),
            None => self.workspace_root.join(export_filename(
                value.get(title_key).and_then(Value::as_str),
                suffix,
                format.extension(),
            )),
        };
        std::fs::write(&path, rendered)?;
        info!(path = %path.display(), format = format.extension(), "Exported artifact");
        Ok(format!("Exported to {}", path.display()))
    }

    fn handle_reset(&self, yes: bool) -> Result<String, ApiError> {
        if !yes {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt("Reset entire project? This will clear all data.")
                .default(false)
                .interact()
                .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;
            if !confirmed {
                return Ok("Reset cancelled".to_string());
            }
        }
        self.project.reset()?;
        Ok("Project reset. Current phase: Story Development".to_string())
    }
}

fn parse_slot(name: &str) -> Result<Slot, ApiError> {
    name.parse::<Slot>().map_err(|e| {
        ApiError::InvalidInput(format!("{}. Known slots: {}", e, slot_names()))
    })
}

fn read_text(path: &Path) -> Result<String, ApiError> {
    std::fs::read_to_string(path).map_err(|e| {
        ApiError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
    })
}

fn pretty(value: &Value) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::InvalidInput(e.to_string()))
}

fn target_label(target: GenerateTarget) -> &'static str {
    match target {
        GenerateTarget::Script => "script",
        GenerateTarget::TranscriptScript => "transcript script",
        GenerateTarget::EditorCut => "editor's cut",
        GenerateTarget::Screenplay => "screenplay",
    }
}

fn clip_id() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
