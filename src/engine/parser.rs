//! Decoding of raw AI responses into typed payloads.
//!
//! Nothing downstream touches a field of the model's output before it has
//! passed through one of the decode functions here: parse failures become
//! `AppError::Parse` with a short raw excerpt for diagnosis, and auto-tailor
//! payloads that are valid JSON but the wrong shape become `AppError::Shape`.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::AppError;

/// How much of the raw response to echo back in parse errors.
const EXCERPT_LEN: usize = 100;

static FENCE_RE: OnceLock<Regex> = OnceLock::new();

fn fence_re() -> &'static Regex {
    FENCE_RE.get_or_init(|| {
        Regex::new(r"(?s)^```(\w*)?\s*\n?(.*?)\n?\s*```$").expect("fence regex is valid")
    })
}

/// Strip a surrounding markdown code fence (with optional language tag) from
/// a response. Text that is not fully wrapped in a fence passes through
/// unchanged apart from outer whitespace trimming.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(caps) = fence_re().captures(trimmed) {
        if let Some(body) = caps.get(2) {
            return body.as_str().trim();
        }
    }
    trimmed
}

/// Parse a structured response as JSON after fence stripping.
pub fn parse_structured(raw: &str) -> Result<Value, AppError> {
    let body = strip_code_fence(raw);
    serde_json::from_str(body).map_err(|e| AppError::Parse {
        reason: e.to_string(),
        excerpt: excerpt(raw),
    })
}

fn excerpt(raw: &str) -> String {
    match raw.char_indices().nth(EXCERPT_LEN) {
        Some((byte_offset, _)) => format!("{}...", &raw[..byte_offset]),
        None => raw.to_string(),
    }
}

/// Keyword extraction payload. Both lists default to empty when the model
/// omits a key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordSets {
    pub keywords: Vec<String>,
    pub action_verbs: Vec<String>,
}

pub fn decode_keywords(raw: &str) -> Result<KeywordSets, AppError> {
    let value = parse_structured(raw)?;
    Ok(KeywordSets {
        keywords: string_array(&value, "keywords"),
        action_verbs: string_array(&value, "actionVerbs"),
    })
}

pub fn decode_suggestions(raw: &str) -> Result<Vec<String>, AppError> {
    let value = parse_structured(raw)?;
    Ok(string_array(&value, "suggestions"))
}

fn string_array(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
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

/// Shape-checked auto-tailor payload.
///
/// The five members the merge requires are guaranteed present with the right
/// JSON types; the entries inside the arrays are still raw values and get
/// their defensive per-field merge in [`crate::engine::merge`].
#[derive(Debug, Clone)]
pub struct TailoredResume {
    pub personal_info: Map<String, Value>,
    pub experience: Vec<Value>,
    pub education: Vec<Value>,
    pub skills: Vec<Value>,
    pub custom_sections: Vec<Value>,
    pub target_role: Option<String>,
    pub target_industry: Option<String>,
}

pub fn decode_tailored(raw: &str) -> Result<TailoredResume, AppError> {
    let value = parse_structured(raw)?;
    let obj = value.as_object().ok_or_else(|| {
        AppError::Shape("auto-tailor response is not a JSON object".into())
    })?;

    let personal_info = obj
        .get("personalInfo")
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| {
            AppError::Shape("auto-tailor response is missing the personalInfo object".into())
        })?;

    Ok(TailoredResume {
        personal_info,
        experience: required_array(obj, "experience")?,
        education: required_array(obj, "education")?,
        skills: required_array(obj, "skills")?,
        custom_sections: required_array(obj, "customSections")?,
        target_role: non_empty_string(obj, "targetRole"),
        target_industry: non_empty_string(obj, "targetIndustry"),
    })
}

fn required_array(obj: &Map<String, Value>, key: &str) -> Result<Vec<Value>, AppError> {
    obj.get(key)
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| AppError::Shape(format!("auto-tailor response is missing the {key} array")))
}

fn non_empty_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
