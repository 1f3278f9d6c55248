use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::resume::ResumeDocument;

/// The AI-assisted operations the frontend can trigger.
///
/// Each variant carries the auxiliary input that operation needs beyond the
/// resume document itself; the document is read from shared state when the
/// prompt is built.
#[derive(Debug, Clone, PartialEq)]
pub enum AiOperation {
    /// Rewrite the professional summary in place.
    Summary,
    /// Rewrite one experience entry's bullet points, selected by position.
    ExperienceRewrite { index: usize },
    /// Extract keywords and action verbs for the target role.
    Keywords,
    /// ATS compatibility analysis of the whole document.
    AtsCheck,
    /// Match the document against a pasted job description.
    JobMatch { job_description: String },
    /// Content suggestions for one named section.
    SmartSuggestions {
        section_name: String,
        existing_content: Option<String>,
    },
    /// Hiring-trends lookup grounded with live web search.
    RecentTrends,
    /// Rewrite the whole document toward a desired role.
    AutoTailor { desired_role: String },
}

impl AiOperation {
    /// Stable name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            AiOperation::Summary => "summary",
            AiOperation::ExperienceRewrite { .. } => "experience_rewrite",
            AiOperation::Keywords => "keywords",
            AiOperation::AtsCheck => "ats_check",
            AiOperation::JobMatch { .. } => "job_match",
            AiOperation::SmartSuggestions { .. } => "smart_suggestions",
            AiOperation::RecentTrends => "recent_trends",
            AiOperation::AutoTailor { .. } => "auto_tailor",
        }
    }

    /// Whether the model is asked for structured JSON output.
    pub fn structured_output(&self) -> bool {
        matches!(
            self,
            AiOperation::Keywords
                | AiOperation::SmartSuggestions { .. }
                | AiOperation::AutoTailor { .. }
        )
    }

    /// Whether the call should be grounded with live web search.
    pub fn grounded_search(&self) -> bool {
        matches!(self, AiOperation::RecentTrends)
    }
}

/// A fully built gateway request: the prompt plus the two output-mode flags.
#[derive(Debug, Clone, PartialEq)]
pub struct AiRequest {
    pub prompt: String,
    pub structured_output: bool,
    pub grounded_search: bool,
}

/// What the gateway hands back: raw response text plus any grounding
/// citations (only populated for grounded calls).
#[derive(Debug, Clone, Default)]
pub struct GatewayReply {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// A web source backing a grounded response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Citation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Display envelope for the informational dialog. Transient, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct AiResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one AI operation as returned over IPC.
///
/// `document` is present exactly when the operation replaced the resume
/// document (summary, experience rewrite, auto-tailor), so the frontend can
/// re-render from the merged value.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AiOutcome {
    pub response: AiResponse,
    pub citations: Vec<Citation>,
    pub document: Option<ResumeDocument>,
}
