//! Property-based tests for truncated JSON repair

use proptest::prelude::*;
use serde_json::{Map, Value};
use tarantino::extract::repair;

/// Arbitrary JSON documents with an object at the root.
pub fn json_object() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-zA-Z0-9 ,.:{}\\[\\]\"\\\\-]{0,12}".prop_map(Value::String),
    ];
    let tree = leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0..6)
                .prop_map(|members| Value::Object(members.into_iter().collect::<Map<_, _>>())),
        ]
    });
    prop::collection::btree_map("[a-z_]{1,8}", tree, 0..6)
        .prop_map(|members| Value::Object(members.into_iter().collect::<Map<_, _>>()))
}

proptest! {
    #[test]
    fn prop_complete_documents_are_unchanged(doc in json_object()) {
        let compact = doc.to_string();
        prop_assert_eq!(repair(&compact).unwrap(), doc.clone());

        let pretty = serde_json::to_string_pretty(&doc).unwrap();
        prop_assert_eq!(repair(&pretty).unwrap(), doc);
    }

    #[test]
    fn prop_every_prefix_repairs_to_an_object(doc in json_object()) {
        let text = serde_json::to_string_pretty(&doc).unwrap();
        for (idx, _) in text.char_indices().skip(1) {
            let prefix = &text[..idx];
            match repair(prefix) {
                Ok(value) => prop_assert!(value.is_object(), "prefix {:?} gave {}", prefix, value),
                Err(e) => prop_assert!(false, "prefix {:?} failed: {}", prefix, e),
            }
        }
    }

    #[test]
    fn prop_repair_is_idempotent(doc in json_object(), cut in 0.0f64..1.0) {
        let text = doc.to_string();
        let len = text.chars().count();
        let keep = ((len as f64) * cut) as usize;
        let prefix: String = text.chars().take(keep.max(1)).collect();

        let once = repair(&prefix).unwrap();
        let twice = repair(&once.to_string()).unwrap();
        prop_assert_eq!(once, twice);
    }
}
