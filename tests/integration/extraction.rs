//! Integration tests for recovering JSON payloads from model output

use serde_json::json;
use tarantino::extract::{extract, extract_detailed, repair, Strategy};

#[test]
fn test_extract_plain_object_verbatim() {
    let extraction = extract_detailed(r#"{"title":"Roots","chapters":[]}"#).unwrap();
    assert_eq!(extraction.strategy, Strategy::Verbatim);
    assert_eq!(extraction.value, json!({"title": "Roots", "chapters": []}));
}

#[test]
fn test_extract_fenced_reply() {
    let reply = "```json\n{\"title\": \"Roots\"}\n```";
    let extraction = extract_detailed(reply).unwrap();
    assert_eq!(extraction.strategy, Strategy::FenceStripped);
    assert_eq!(extraction.value, json!({"title": "Roots"}));
}

#[test]
fn test_extract_prose_wrapped_reply() {
    let reply = "Here is the script you asked for:\n{\"title\": \"Roots\", \"acts\": [1, 2]}\nLet me know if you want changes.";
    let extraction = extract_detailed(reply).unwrap();
    assert_eq!(extraction.strategy, Strategy::OutermostBraces);
    assert_eq!(extraction.value, json!({"title": "Roots", "acts": [1, 2]}));
}

#[test]
fn test_extract_truncated_reply_keeps_complete_members() {
    let reply = r#"```json
{
  "title": "Roots",
  "chapters": [
    {"chapter_number": 1, "title": "Cold Open", "beats": [{"speaker": "Ana", "quote": "We started in a gar"#;
    let extraction = extract_detailed(reply).unwrap();
    assert_eq!(extraction.strategy, Strategy::Repaired);
    assert_eq!(
        extraction.value,
        json!({
            "title": "Roots",
            "chapters": [{"chapter_number": 1, "title": "Cold Open", "beats": [{"speaker": "Ana"}]}]
        })
    );
}

#[test]
fn test_extract_gives_up_without_braces() {
    assert!(extract("").is_none());
    assert!(extract("I cannot help with that request.").is_none());
    assert!(extract("```\n```").is_none());
}

#[test]
fn test_extract_gives_up_on_garbage_after_brace() {
    assert!(extract("{ this is not json at all").is_none());
}

#[test]
fn test_top_level_array_is_accepted_verbatim() {
    assert_eq!(extract("[1, 2, 3]"), Some(json!([1, 2, 3])));
}

#[test]
fn test_repair_is_identity_on_complete_documents() {
    let doc = json!({
        "letter_to_editor": "Keep it \"raw\", {honest} and [short].",
        "sequences": [{"sequence_number": 1, "cuts": []}],
        "delivery_specs": null
    });
    assert_eq!(repair(&doc.to_string()).unwrap(), doc);
}
