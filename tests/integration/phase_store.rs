//! Integration tests for phase store persistence and the typed project view

use serde_json::json;
use std::sync::Arc;
use tarantino::project::{Phase, Project, Slot, StoryBrief, Transcript};
use tarantino::store::{PhaseStore, SledPhaseStore};
use tempfile::TempDir;

#[test]
fn test_project_state_persists_across_reopen() {
    let temp = TempDir::new().unwrap();

    {
        let store = Arc::new(SledPhaseStore::new(temp.path()).unwrap());
        let project = Project::new(store);
        project.set_answer("title", "Roots").unwrap();
        project
            .add_transcript(Transcript::from_file_name("ana_interview.txt", "We started..."))
            .unwrap();
        project
            .set_story_brief(&StoryBrief {
                direction: "Follow the founder".to_string(),
                ..StoryBrief::default()
            })
            .unwrap();
        project.complete_phase(Phase::StoryDevelopment).unwrap();
    }

    let store = Arc::new(SledPhaseStore::new(temp.path()).unwrap());
    let project = Project::new(store.clone());
    assert_eq!(project.answers().unwrap().get("title").map(String::as_str), Some("Roots"));
    assert_eq!(project.transcripts().unwrap()[0].name, "ana interview");
    assert_eq!(project.story_brief().unwrap().direction, "Follow the founder");
    assert_eq!(project.phase().unwrap(), Phase::ScriptGeneration);
    assert_eq!(project.completed_phases().unwrap(), vec![Phase::StoryDevelopment]);

    let keys = store.keys().unwrap();
    assert!(keys.contains(&"storyBrief".to_string()));
    assert!(keys.contains(&"completedPhases".to_string()));
}

#[test]
fn test_reset_clears_everything_but_first_phase() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(SledPhaseStore::new(temp.path()).unwrap());
    let project = Project::new(store.clone());
    project.set_raw(Slot::EditorCut, &json!({"editor_cut_title": "Cut"})).unwrap();
    project.complete_phase(Phase::StoryDevelopment).unwrap();

    project.reset().unwrap();

    assert_eq!(store.keys().unwrap(), vec!["phase".to_string()]);
    assert_eq!(project.phase().unwrap(), Phase::StoryDevelopment);
}

#[test]
fn test_mismatched_slot_shape_reads_as_default() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(SledPhaseStore::new(temp.path()).unwrap());
    store.set(Slot::Transcripts.key(), &json!({"not": "a list"})).unwrap();
    store.set(Slot::Phase.key(), &json!("somewhere_else")).unwrap();

    let project = Project::new(store);
    assert!(project.transcripts().unwrap().is_empty());
    assert_eq!(project.phase().unwrap(), Phase::StoryDevelopment);
}
