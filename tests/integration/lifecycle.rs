//! Integration tests for the generation lifecycle over a persistent phase store

use crate::integration::test_utils::ScriptedGenerator;
use serde_json::json;
use std::sync::Arc;
use tarantino::error::GenerationError;
use tarantino::lifecycle::{GenerationController, LifecycleStatus};
use tarantino::project::{Slot, StoryAnswers};
use tarantino::prompts::script_prompt;
use tarantino::store::{PhaseStore, SledPhaseStore};
use tempfile::TempDir;

fn answers(title: &str) -> StoryAnswers {
    let mut answers = StoryAnswers::new();
    answers.insert("title".to_string(), title.to_string());
    answers
}

#[tokio::test]
async fn test_payload_survives_store_reopen() {
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("store");

    {
        let store: Arc<dyn PhaseStore> = Arc::new(SledPhaseStore::new(&store_path).unwrap());
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(json!({"title": "Roots"}))]));
        let controller = GenerationController::new(generator.clone(), script_prompt)
            .with_slot(store, Slot::Script.key());

        let value = controller.generate(&answers("Roots")).await.unwrap();
        assert_eq!(value, json!({"title": "Roots"}));
        assert!(generator.last_prompt().unwrap().contains("- Title: Roots"));
    }

    let store: Arc<dyn PhaseStore> = Arc::new(SledPhaseStore::new(&store_path).unwrap());
    let generator = Arc::new(ScriptedGenerator::new(vec![]));
    let controller = GenerationController::new(generator.clone(), script_prompt)
        .with_slot(store, Slot::Script.key());

    let value = controller.ensure_generated(&answers("Roots")).await.unwrap();
    assert_eq!(value, json!({"title": "Roots"}));
    assert_eq!(controller.state().status, LifecycleStatus::Success);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_subscriber_sees_loading_then_error() {
    let generator = Arc::new(ScriptedGenerator::new(vec![Err(GenerationError::Provider {
        status: 529,
        body: "overloaded".to_string(),
    })]));
    let controller = GenerationController::new(generator, script_prompt);
    let mut states = controller.subscribe();
    assert_eq!(states.borrow_and_update().status, LifecycleStatus::Idle);

    let observer = tokio::spawn(async move {
        let mut seen = Vec::new();
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            let done = state.status == LifecycleStatus::Error;
            seen.push(state.status);
            if done {
                break;
            }
        }
        seen
    });

    tokio::task::yield_now().await;
    assert!(controller.generate(&answers("Roots")).await.is_none());

    let seen = observer.await.unwrap();
    assert_eq!(seen.last(), Some(&LifecycleStatus::Error));
    let state = controller.state();
    assert!(state.last_error.unwrap().contains("529"));
}

#[tokio::test]
async fn test_failed_regeneration_keeps_stored_payload() {
    let temp = TempDir::new().unwrap();
    let store: Arc<dyn PhaseStore> = Arc::new(SledPhaseStore::new(temp.path()).unwrap());
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Ok(json!({"title": "First"})),
        Err(GenerationError::InvalidPayload {
            preview: "nope".to_string(),
        }),
    ]));
    let controller = GenerationController::new(generator, script_prompt)
        .with_slot(store.clone(), Slot::Script.key());

    controller.generate(&answers("First")).await.unwrap();
    assert!(controller.generate(&answers("Second")).await.is_none());

    let state = controller.state();
    assert_eq!(state.status, LifecycleStatus::Error);
    assert_eq!(state.last_error.as_deref(), Some("AI returned invalid JSON. Please retry."));
    assert_eq!(controller.data(), Some(json!({"title": "First"})));
    assert_eq!(
        store.get(Slot::Script.key()).unwrap(),
        Some(json!({"title": "First"}))
    );
}
