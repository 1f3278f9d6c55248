use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::AppError;

/// Canonical in-memory resume document.
///
/// Exclusively owned by [`crate::AppState`]; every mutation replaces the whole
/// value (form edits and AI merges alike), so readers never observe a torn
/// intermediate state. Field names are exported to the frontend via ts-rs and
/// serialized in camelCase to match the form bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub custom_sections: Vec<CustomSection>,
    pub target_role: Option<String>,
    pub target_industry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub address: String,
    pub professional_summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    /// Always present, possibly holding empty placeholder strings.
    pub responsibilities: Vec<String>,
    pub is_current: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub graduation_date: String,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    /// Open label set; the form offers Technical/Soft/Language/Other but any
    /// string round-trips.
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomSection {
    pub id: String,
    pub title: String,
    pub content: String,
}

pub const DEFAULT_SKILL_CATEGORY: &str = "Technical";

/// Generate the identifier for a newly appended list entry.
pub fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}

impl Experience {
    /// Blank entry as created by the form's "add experience" action.
    pub fn empty() -> Self {
        Self {
            id: new_entry_id(),
            responsibilities: vec![String::new()],
            ..Default::default()
        }
    }
}

impl Education {
    pub fn empty() -> Self {
        Self {
            id: new_entry_id(),
            ..Default::default()
        }
    }
}

impl Skill {
    pub fn empty() -> Self {
        Self {
            id: new_entry_id(),
            name: String::new(),
            category: DEFAULT_SKILL_CATEGORY.to_string(),
        }
    }
}

impl CustomSection {
    pub fn empty() -> Self {
        Self {
            id: new_entry_id(),
            ..Default::default()
        }
    }
}

impl ResumeDocument {
    /// Check the entry-id invariants: every id non-empty and unique within its
    /// collection. Called on whole-document replacements coming in over IPC.
    pub fn validate(&self) -> Result<(), AppError> {
        check_ids("experience", self.experience.iter().map(|e| e.id.as_str()))?;
        check_ids("education", self.education.iter().map(|e| e.id.as_str()))?;
        check_ids("skills", self.skills.iter().map(|s| s.id.as_str()))?;
        check_ids(
            "customSections",
            self.custom_sections.iter().map(|c| c.id.as_str()),
        )?;
        Ok(())
    }
}

fn check_ids<'a>(section: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(AppError::Validation(format!(
                "{section} entry is missing an id"
            )));
        }
        if !seen.insert(id) {
            return Err(AppError::Validation(format!(
                "{section} entries share the id {id}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_has_all_collections() {
        let doc = ResumeDocument::default();
        assert!(doc.experience.is_empty());
        assert!(doc.education.is_empty());
        assert!(doc.skills.is_empty());
        assert!(doc.custom_sections.is_empty());
        assert_eq!(doc.personal_info.professional_summary, "");
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_empty_entries_get_fresh_ids() {
        let a = Experience::empty();
        let b = Experience::empty();
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        // Blank experience starts with one empty responsibility placeholder.
        assert_eq!(a.responsibilities, vec![String::new()]);
        assert_eq!(Skill::empty().category, DEFAULT_SKILL_CATEGORY);
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let mut doc = ResumeDocument::default();
        let entry = Skill {
            id: "dup".into(),
            name: "Rust".into(),
            category: "Technical".into(),
        };
        doc.skills.push(entry.clone());
        doc.skills.push(entry);
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_id() {
        let mut doc = ResumeDocument::default();
        doc.education.push(Education {
            id: String::new(),
            ..Default::default()
        });
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_camel_case_wire_names() {
        let doc = ResumeDocument {
            personal_info: PersonalInfo {
                full_name: "Ada Lovelace".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["personalInfo"]["fullName"], "Ada Lovelace");
        assert!(json.get("customSections").is_some());
    }
}
