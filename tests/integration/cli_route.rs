//! Integration tests for the CLI route table driving the full wizard

use crate::integration::test_utils::{with_isolated_env, ScriptedGenerator};
use serde_json::json;
use std::sync::Arc;
use tarantino::cli::{map_error, Commands, ExportFormat, ExportTarget, GenerateTarget, RunContext};
use tarantino::config::TarantinoConfig;
use tarantino::error::{ApiError, GenerationError};
use tarantino::project::{Phase, Slot};
use tarantino::store::SledPhaseStore;
use tempfile::TempDir;

fn generate(target: GenerateTarget, force: bool) -> Commands {
    Commands::Generate {
        target,
        force,
        json: false,
    }
}

#[test]
fn test_transcript_workflow_end_to_end() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().to_path_buf();
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Ok(json!({"title": "Garage Days", "chapters": [{"chapter_number": 1, "chapter_title": "Start", "beats": []}]})),
        Ok(json!({"editor_cut_title": "Garage Days", "sequences": []})),
    ]));
    let store = Arc::new(SledPhaseStore::new(workspace.join(".tarantino").join("store")).unwrap());
    let ctx = RunContext::with_parts(
        workspace.clone(),
        TarantinoConfig::default(),
        store,
        generator.clone(),
        true,
    )
    .unwrap();

    for (file, text) in [("ana.txt", "We started in a garage."), ("ben.txt", "I built the tool.")] {
        let path = workspace.join(file);
        std::fs::write(&path, text).unwrap();
        ctx.execute(&Commands::AddTranscript { file: path, name: None })
            .unwrap();
    }

    // direction is still missing
    let err = ctx
        .execute(&generate(GenerateTarget::TranscriptScript, false))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert_eq!(generator.calls(), 0);

    ctx.execute(&Commands::Brief {
        title: Some("Garage Days".to_string()),
        direction: Some("Side project to company".to_string()),
        tone: None,
        duration: None,
        notes: None,
    })
    .unwrap();

    let out = ctx
        .execute(&generate(GenerateTarget::TranscriptScript, false))
        .unwrap();
    assert!(out.contains("transcriptScript"));
    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("--- TRANSCRIPT 2: BEN ---"));
    assert!(prompt.contains("Side project to company"));

    ctx.execute(&generate(GenerateTarget::EditorCut, false)).unwrap();
    assert!(generator.last_prompt().unwrap().contains("\"Garage Days\""));
    assert_eq!(generator.calls(), 2);

    ctx.execute(&Commands::Export {
        target: ExportTarget::Script,
        format: ExportFormat::Md,
        output: None,
    })
    .unwrap();
    ctx.execute(&Commands::Export {
        target: ExportTarget::EditorCut,
        format: ExportFormat::Md,
        output: None,
    })
    .unwrap();
    ctx.execute(&Commands::Export {
        target: ExportTarget::EditorCut,
        format: ExportFormat::Doc,
        output: None,
    })
    .unwrap();
    let script_md = std::fs::read_to_string(workspace.join("Garage_Days_script.md")).unwrap();
    assert!(script_md.contains("## Chapter 1: Start"));
    assert!(workspace.join("Garage_Days_editors_cut.md").exists());
    let cut_doc = std::fs::read_to_string(workspace.join("Garage_Days_editors_cut.doc")).unwrap();
    assert!(cut_doc.starts_with("<html xmlns:o="));

    ctx.execute(&Commands::Complete {
        phase: "script_generation".to_string(),
    })
    .unwrap();
    assert_eq!(ctx.project().phase().unwrap(), Phase::FootageReview);
}

#[test]
fn test_screenplay_uses_script_and_footage() {
    let temp = TempDir::new().unwrap();
    let generator = Arc::new(ScriptedGenerator::new(vec![Ok(
        json!({"screenplay_title": "Garage Days"}),
    )]));
    let ctx = RunContext::with_parts(
        temp.path().to_path_buf(),
        TarantinoConfig::default(),
        Arc::new(tarantino::store::MemoryPhaseStore::new()),
        generator.clone(),
        true,
    )
    .unwrap();

    let err = ctx.execute(&generate(GenerateTarget::Screenplay, false)).unwrap_err();
    assert!(matches!(err, ApiError::SlotEmpty(ref slot) if slot == "script"));

    ctx.project()
        .set_raw(Slot::Script, &json!({"title": "Garage Days"}))
        .unwrap();
    ctx.execute(&Commands::AddClip {
        label: "Garage wide".to_string(),
        kind: "broll".to_string(),
        duration: Some("0:45".to_string()),
        subjects: None,
        transcript_file: None,
        notes: None,
    })
    .unwrap();

    let out = ctx
        .execute(&Commands::Generate {
            target: GenerateTarget::Screenplay,
            force: false,
            json: true,
        })
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["screenplay_title"], json!("Garage Days"));
    assert!(generator
        .last_prompt()
        .unwrap()
        .contains("CLIP 1: \"Garage wide\" (broll, 0:45)"));
}

#[test]
fn test_missing_credential_surfaces_configuration_error() {
    let temp = TempDir::new().unwrap();
    with_isolated_env(&temp, || {
        let workspace = temp.path().join("doc");
        std::fs::create_dir_all(&workspace).unwrap();

        let ctx = RunContext::new(workspace.clone(), None).unwrap();
        let err = ctx
            .execute(&generate(GenerateTarget::Script, false))
            .unwrap_err();
        match &err {
            ApiError::Generation(GenerationError::Configuration(message)) => {
                assert!(message.contains("ANTHROPIC_API_KEY"));
            }
            other => panic!("expected configuration failure, got {:?}", other),
        }
        let shown = map_error(&err);
        assert!(shown.starts_with("Configuration error:"));
        assert!(!shown.contains("retry"));
        assert!(workspace.join(".tarantino").join("store").exists());
    });
}

#[test]
fn test_retryable_failure_suggests_retry() {
    let temp = TempDir::new().unwrap();
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Err(GenerationError::Provider {
            status: 500,
            body: "overloaded".to_string(),
        }),
        Ok(json!({"title": "Second Try"})),
    ]));
    let ctx = RunContext::with_parts(
        temp.path().to_path_buf(),
        TarantinoConfig::default(),
        Arc::new(SledPhaseStore::new(temp.path().join("store")).unwrap()),
        generator.clone(),
        true,
    )
    .unwrap();

    let err = ctx
        .execute(&generate(GenerateTarget::Script, false))
        .unwrap_err();
    assert!(err.to_string().contains("500"));
    let shown = map_error(&err);
    assert!(shown.contains("overloaded"));
    assert!(shown.ends_with("Run the command again with --force to retry."));
    assert!(ctx.project().raw(Slot::Script).unwrap().is_none());

    let out = ctx
        .execute(&generate(GenerateTarget::Script, true))
        .unwrap();
    assert!(out.contains("Second Try"));
    assert_eq!(generator.calls(), 2);
}
