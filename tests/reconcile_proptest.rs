//! Property-based coverage of the auto-tailor merge invariants: after any
//! merge, ids within a collection are unique, entries that arrived with a
//! usable id keep it, and re-merging the output changes nothing.

use std::collections::HashSet;

use proptest::prelude::*;
use serde_json::json;

use app_lib::engine::merge::merge_tailored;
use app_lib::engine::parser::decode_tailored;
use app_lib::resume::{ResumeDocument, Skill};

fn existing_document(ids: &[String]) -> ResumeDocument {
    ResumeDocument {
        skills: ids
            .iter()
            .map(|id| Skill {
                id: id.clone(),
                name: format!("skill-{id}"),
                category: "Technical".into(),
            })
            .collect(),
        ..Default::default()
    }
}

/// Build an auto-tailor payload whose skills carry the given optional ids.
fn payload_with_skill_ids(ids: &[Option<String>]) -> String {
    let skills: Vec<serde_json::Value> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| match id {
            Some(id) => json!({"id": id, "name": format!("s{i}"), "category": "Technical"}),
            None => json!({"name": format!("s{i}"), "category": "Technical"}),
        })
        .collect();
    json!({
        "personalInfo": {},
        "experience": [],
        "education": [],
        "skills": skills,
        "customSections": []
    })
    .to_string()
}

fn id_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        2 => Just(None),
        2 => "[a-d]".prop_map(Some),
        1 => "[a-z]{6}".prop_map(Some),
        1 => Just(Some(String::new())),
    ]
}

proptest! {
    #[test]
    fn merged_ids_are_always_unique(
        existing in proptest::collection::hash_set("[a-d]", 0..4),
        incoming in proptest::collection::vec(id_strategy(), 0..10),
    ) {
        let existing: Vec<String> = existing.into_iter().collect();
        let document = existing_document(&existing);
        let tailored = decode_tailored(&payload_with_skill_ids(&incoming)).unwrap();
        let merged = merge_tailored(&document, tailored, "Engineer");

        let ids: Vec<&str> = merged.skills.iter().map(|s| s.id.as_str()).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), ids.len(), "duplicate ids in {:?}", ids);
        prop_assert!(ids.iter().all(|id| !id.is_empty()));
        prop_assert_eq!(merged.skills.len(), incoming.len());
    }

    #[test]
    fn first_claim_on_an_id_wins(
        incoming in proptest::collection::vec(id_strategy(), 1..10),
    ) {
        let document = existing_document(&[]);
        let tailored = decode_tailored(&payload_with_skill_ids(&incoming)).unwrap();
        let merged = merge_tailored(&document, tailored, "Engineer");

        let mut seen = HashSet::new();
        for (slot, merged_skill) in incoming.iter().zip(merged.skills.iter()) {
            if let Some(id) = slot.as_deref().filter(|id| !id.is_empty()) {
                if seen.insert(id.to_string()) {
                    // The first entry to claim an id keeps it verbatim.
                    prop_assert_eq!(&merged_skill.id, id);
                }
            }
            seen.insert(merged_skill.id.clone());
        }
    }

    #[test]
    fn remerging_the_output_is_identity_on_ids(
        existing in proptest::collection::hash_set("[a-d]", 0..4),
        incoming in proptest::collection::vec(id_strategy(), 0..10),
    ) {
        let existing: Vec<String> = existing.into_iter().collect();
        let document = existing_document(&existing);
        let tailored = decode_tailored(&payload_with_skill_ids(&incoming)).unwrap();
        let first = merge_tailored(&document, tailored, "Engineer");

        let round_trip = json!({
            "personalInfo": {},
            "experience": [],
            "education": [],
            "skills": &first.skills,
            "customSections": []
        })
        .to_string();
        let second = merge_tailored(
            &first,
            decode_tailored(&round_trip).unwrap(),
            "Engineer",
        );

        let first_ids: Vec<&str> = first.skills.iter().map(|s| s.id.as_str()).collect();
        let second_ids: Vec<&str> = second.skills.iter().map(|s| s.id.as_str()).collect();
        prop_assert_eq!(first_ids, second_ids);
    }
}
