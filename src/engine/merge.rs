//! Response merge engine.
//!
//! Takes the gateway's raw reply and, per operation kind, either produces a
//! replacement resume document or a display-only envelope. Every failure path
//! returns an error *before* a new document is produced, so the caller's
//! atomic-swap contract holds: on any `Err` the live document is untouched.

use std::collections::HashSet;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::engine::parser::{self, KeywordSets, TailoredResume};
use crate::engine::types::{AiOperation, AiResponse, GatewayReply};
use crate::error::AppError;
use crate::resume::{
    CustomSection, Education, Experience, PersonalInfo, ResumeDocument, Skill,
    DEFAULT_SKILL_CATEGORY,
};

/// Outcome of a successful merge.
#[derive(Debug, Clone)]
pub enum MergeOutcome {
    /// The document was replaced wholesale; `response` carries an optional
    /// confirmation for the dialog.
    Replace {
        document: ResumeDocument,
        response: Option<AiResponse>,
    },
    /// Display-only result; the document is untouched.
    Display(AiResponse),
}

/// Interpret the gateway reply for one operation against the current document.
pub fn apply(
    op: &AiOperation,
    current: &ResumeDocument,
    reply: &GatewayReply,
) -> Result<MergeOutcome, AppError> {
    match op {
        AiOperation::Summary => {
            let text = non_empty_text(reply)?;
            let mut document = current.clone();
            document.personal_info.professional_summary = text;
            Ok(MergeOutcome::Replace {
                document,
                response: None,
            })
        }

        AiOperation::ExperienceRewrite { index } => {
            if *index >= current.experience.len() {
                return Err(AppError::Validation(format!(
                    "No experience entry at position {index}."
                )));
            }
            let text = non_empty_text(reply)?;
            let bullets = bullet_lines(&text);
            let mut document = current.clone();
            // A rewrite consisting only of blank lines keeps the existing
            // bullets rather than wiping them.
            if !bullets.is_empty() {
                document.experience[*index].responsibilities = bullets;
            }
            Ok(MergeOutcome::Replace {
                document,
                response: None,
            })
        }

        AiOperation::Keywords => {
            let sets = parser::decode_keywords(&reply.text)?;
            Ok(MergeOutcome::Display(keywords_envelope(sets)))
        }

        AiOperation::AtsCheck | AiOperation::JobMatch { .. } => {
            let text = non_empty_text(reply)?;
            Ok(MergeOutcome::Display(AiResponse {
                analysis: Some(text),
                ..Default::default()
            }))
        }

        AiOperation::SmartSuggestions { .. } => {
            let suggestions = parser::decode_suggestions(&reply.text)?;
            Ok(MergeOutcome::Display(AiResponse {
                text: Some(suggestions.join("\n")),
                suggestions: Some(suggestions),
                ..Default::default()
            }))
        }

        AiOperation::RecentTrends => {
            let text = non_empty_text(reply)?;
            Ok(MergeOutcome::Display(AiResponse {
                text: Some(text),
                ..Default::default()
            }))
        }

        AiOperation::AutoTailor { desired_role } => {
            let tailored = parser::decode_tailored(&reply.text)?;
            let document = merge_tailored(current, tailored, desired_role);
            let response = AiResponse {
                text: Some(format!(
                    "Resume successfully auto-tailored for the role: {desired_role}. \
                     Please review the changes."
                )),
                ..Default::default()
            };
            Ok(MergeOutcome::Replace {
                document,
                response: Some(response),
            })
        }
    }
}

fn non_empty_text(reply: &GatewayReply) -> Result<String, AppError> {
    let text = reply.text.trim();
    if text.is_empty() {
        return Err(AppError::Parse {
            reason: "AI returned an empty response".into(),
            excerpt: String::new(),
        });
    }
    Ok(text.to_string())
}

/// Split a bullet-point rewrite into clean responsibility lines: strip a
/// leading "- " marker, trim, and discard blanks.
fn bullet_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_prefix("- ").unwrap_or(line).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn keywords_envelope(sets: KeywordSets) -> AiResponse {
    let text = format!(
        "Keywords: {}\nAction Verbs: {}",
        sets.keywords.join(", "),
        sets.action_verbs.join(", ")
    );
    AiResponse {
        text: Some(text),
        keywords: Some(sets.keywords),
        suggestions: Some(sets.action_verbs),
        ..Default::default()
    }
}

/// Build the replacement document from a shape-checked auto-tailor payload.
///
/// Identifier reconciliation runs independently per collection, and every
/// entry is defensively merged against its default shape so the document
/// invariants hold even when the model omitted fields.
pub fn merge_tailored(
    current: &ResumeDocument,
    tailored: TailoredResume,
    desired_role: &str,
) -> ResumeDocument {
    let experience_ids: HashSet<String> =
        current.experience.iter().map(|e| e.id.clone()).collect();
    let education_ids: HashSet<String> = current.education.iter().map(|e| e.id.clone()).collect();
    let skill_ids: HashSet<String> = current.skills.iter().map(|s| s.id.clone()).collect();
    let section_ids: HashSet<String> =
        current.custom_sections.iter().map(|c| c.id.clone()).collect();

    ResumeDocument {
        personal_info: merge_personal_info(&tailored.personal_info),
        experience: reconcile_ids(tailored.experience, &experience_ids)
            .into_iter()
            .map(|(id, obj)| Experience {
                id,
                job_title: text_field(&obj, "jobTitle"),
                company: text_field(&obj, "company"),
                location: text_field(&obj, "location"),
                start_date: text_field(&obj, "startDate"),
                end_date: text_field(&obj, "endDate"),
                // Forced to an array: anything else the model sent collapses
                // to empty.
                responsibilities: string_list(&obj, "responsibilities"),
                is_current: bool_field(&obj, "isCurrent"),
            })
            .collect(),
        education: reconcile_ids(tailored.education, &education_ids)
            .into_iter()
            .map(|(id, obj)| Education {
                id,
                institution: text_field(&obj, "institution"),
                degree: text_field(&obj, "degree"),
                field_of_study: text_field(&obj, "fieldOfStudy"),
                graduation_date: text_field(&obj, "graduationDate"),
                gpa: opt_text_field(&obj, "gpa"),
            })
            .collect(),
        skills: reconcile_ids(tailored.skills, &skill_ids)
            .into_iter()
            .map(|(id, obj)| Skill {
                id,
                name: text_field(&obj, "name"),
                category: obj
                    .get("category")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_SKILL_CATEGORY)
                    .to_string(),
            })
            .collect(),
        custom_sections: reconcile_ids(tailored.custom_sections, &section_ids)
            .into_iter()
            .map(|(id, obj)| CustomSection {
                id,
                title: text_field(&obj, "title"),
                content: text_field(&obj, "content"),
            })
            .collect(),
        target_role: tailored
            .target_role
            .or_else(|| Some(desired_role.to_string())),
        target_industry: tailored
            .target_industry
            .or_else(|| current.target_industry.clone()),
    }
}

/// Assign a valid unique id to every incoming entry.
///
/// An entry keeps its own non-empty string id unless that id was already
/// taken earlier in the same batch; otherwise it gets a fresh UUID colliding
/// with neither the document's existing ids nor anything assigned so far.
/// Tracking `used` across the whole batch is what rules out intra-batch
/// duplicates. Non-object entries are dropped.
fn reconcile_ids(
    items: Vec<Value>,
    existing_ids: &HashSet<String>,
) -> Vec<(String, Map<String, Value>)> {
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(items.len());

    for item in items {
        let Value::Object(obj) = item else { continue };
        let incoming = obj
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty() && !used.contains(*id))
            .map(str::to_owned);
        let id = incoming.unwrap_or_else(|| fresh_id(existing_ids, &used));
        used.insert(id.clone());
        out.push((id, obj));
    }

    out
}

fn fresh_id(existing_ids: &HashSet<String>, used: &HashSet<String>) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !existing_ids.contains(&id) && !used.contains(&id) {
            return id;
        }
    }
}

fn merge_personal_info(obj: &Map<String, Value>) -> PersonalInfo {
    PersonalInfo {
        full_name: text_field(obj, "fullName"),
        email: text_field(obj, "email"),
        phone: text_field(obj, "phone"),
        linkedin: text_field(obj, "linkedin"),
        github: text_field(obj, "github"),
        portfolio: text_field(obj, "portfolio"),
        address: text_field(obj, "address"),
        professional_summary: text_field(obj, "professionalSummary"),
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn opt_text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn bool_field(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
