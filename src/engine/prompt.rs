//! AI request construction.
//!
//! One prompt per operation kind, each embedding the relevant slice of the
//! resume document. Precondition checks live here so a missing job
//! description or desired role fails before any network call is made.

use crate::engine::types::{AiOperation, AiRequest};
use crate::error::AppError;
use crate::resume::{Experience, ResumeDocument};

/// Build the gateway request for one operation against the current document.
pub fn build_request(op: &AiOperation, document: &ResumeDocument) -> Result<AiRequest, AppError> {
    let prompt = match op {
        AiOperation::Summary => summary_prompt(document),
        AiOperation::ExperienceRewrite { index } => {
            let entry = document.experience.get(*index).ok_or_else(|| {
                AppError::Validation(format!("No experience entry at position {index}."))
            })?;
            experience_prompt(entry)
        }
        AiOperation::Keywords => keywords_prompt(document),
        AiOperation::AtsCheck => ats_prompt(document)?,
        AiOperation::JobMatch { job_description } => {
            if job_description.trim().is_empty() {
                return Err(AppError::Validation(
                    "Please provide a job description for matching.".into(),
                ));
            }
            job_match_prompt(document, job_description)?
        }
        AiOperation::SmartSuggestions {
            section_name,
            existing_content,
        } => suggestions_prompt(document, section_name, existing_content.as_deref()),
        AiOperation::RecentTrends => trends_prompt(document),
        AiOperation::AutoTailor { desired_role } => {
            if desired_role.trim().is_empty() {
                return Err(AppError::Validation(
                    "Please specify the desired role for auto-tailoring.".into(),
                ));
            }
            auto_tailor_prompt(document, desired_role)?
        }
    };

    Ok(AiRequest {
        prompt,
        structured_output: op.structured_output(),
        grounded_search: op.grounded_search(),
    })
}

fn role_of(document: &ResumeDocument, fallback: &str) -> String {
    document
        .target_role
        .as_deref()
        .filter(|r| !r.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn industry_of(document: &ResumeDocument, fallback: &str) -> String {
    document
        .target_industry
        .as_deref()
        .filter(|i| !i.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn summary_prompt(document: &ResumeDocument) -> String {
    let skills = document
        .skills
        .iter()
        .map(|s| s.name.as_str())
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let skills_hint = if skills.is_empty() {
        String::new()
    } else {
        format!(" Emphasize skills such as {skills} where relevant.")
    };
    format!(
        "Generate a compelling professional summary for a {role} with experience in {industry}. \
         Current summary (if any): \"{current}\".{skills_hint} \
         Output plain text. Max 3-4 sentences.",
        role = role_of(document, "professional"),
        industry = industry_of(document, "their field"),
        current = document.personal_info.professional_summary,
    )
}

fn experience_prompt(entry: &Experience) -> String {
    format!(
        "For a {title} role at {company}, generate 3-5 concise, action-oriented bullet points \
         focusing on achievements and quantifiable results. \
         Current responsibilities for context (if any): {context}. \
         Output plain text, with each point on a new line, starting with an action verb.",
        title = entry.job_title,
        company = entry.company,
        context = entry.responsibilities.join("; "),
    )
}

fn keywords_prompt(document: &ResumeDocument) -> String {
    format!(
        "Provide a list of 10-15 relevant keywords (technical and soft skills) and 5-7 impactful \
         action verbs for a resume targeting a '{role}' role in the '{industry}'. \
         Return as a JSON object with keys \"keywords\" (array of strings) and \
         \"actionVerbs\" (array of strings).",
        role = role_of(document, "general professional"),
        industry = industry_of(document, "general industry"),
    )
}

fn ats_prompt(document: &ResumeDocument) -> Result<String, AppError> {
    let resume_json = serde_json::to_string(document)?;
    Ok(format!(
        "Analyze the following resume content (JSON format) for ATS compatibility for the role \
         of {role}. Provide a list of actionable suggestions to improve its parsability and \
         keyword relevance. Consider: standard fonts, layout complexity, keyword density, \
         section clarity, and structure. Output plain text. Resume Content: {resume_json}",
        role = role_of(document, "the target role"),
    ))
}

fn job_match_prompt(document: &ResumeDocument, job_description: &str) -> Result<String, AppError> {
    let resume_json = serde_json::to_string(document)?;
    Ok(format!(
        "Analyze this resume (JSON format) against the provided job description. Identify key \
         skills/experiences from the job description present in the resume, and those missing \
         or underrepresented. Provide a summary of the match percentage (0-100%) and actionable \
         suggestions for tailoring. Output plain text. \
         Resume: {resume_json}\n\nJob Description: {job_description}",
    ))
}

fn suggestions_prompt(
    document: &ResumeDocument,
    section_name: &str,
    existing_content: Option<&str>,
) -> String {
    let context = existing_content
        .filter(|c| !c.is_empty())
        .map(|c| format!(" Current content for context: \"{c}\"."))
        .unwrap_or_default();
    format!(
        "Provide 3-5 smart content suggestions for the '{section_name}' of a resume for a \
         '{role}' in the '{industry}'.{context} \
         Return as a JSON object with a \"suggestions\" key (array of strings).",
        role = role_of(document, "professional"),
        industry = industry_of(document, "their field"),
    )
}

fn trends_prompt(document: &ResumeDocument) -> String {
    format!(
        "What are the current hiring trends, most in-demand skills, and salary expectations \
         (if available and appropriate) for a {role} in the {industry} industry as of today? \
         Output plain text.",
        role = role_of(document, "professional"),
        industry = industry_of(document, "general technology"),
    )
}

fn auto_tailor_prompt(document: &ResumeDocument, desired_role: &str) -> Result<String, AppError> {
    let resume_json = serde_json::to_string(document)?;
    Ok(format!(
        r#"Analyze the following resume data:
{resume_json}

Tailor this entire resume to best fit the desired role of: "{desired_role}".
Your goal is to make the candidate as strong as possible for this specific role. This includes:
1. Rewrite 'professionalSummary' to be highly targeted and impactful (3-4 sentences).
2. Rephrase 'experience' responsibilities (bullet points) to highlight achievements and skills relevant to "{desired_role}". Ensure responsibilities remain an array of concise, action-oriented strings.
3. Prioritize, add, or suggest removal of 'skills' to match "{desired_role}". Skills should maintain their structure ({{id, name, category}}).
4. Adjust 'education' or 'customSections' content if there's a clear opportunity to improve relevance for "{desired_role}".
5. Preserve existing IDs for items that are modified. For new items (e.g., a new skill), generate a new unique string ID. If an item is removed, it should not be in the output.
6. The 'targetRole' field in the output should be "{desired_role}".
7. The 'targetIndustry' can be updated if a more specific industry can be inferred from the role, otherwise keep the existing one.

Return the FULL updated resume data as a single, valid JSON object strictly matching the structure shown below.
The output MUST be ONLY the JSON object, without any surrounding text, comments, or markdown.
Structure:
{{
  "personalInfo": {{ "fullName": "string", "email": "string", "phone": "string", "linkedin": "string", "github": "string", "portfolio": "string", "address": "string", "professionalSummary": "string" }},
  "experience": [ {{ "id": "string", "jobTitle": "string", "company": "string", "location": "string", "startDate": "string", "endDate": "string", "responsibilities": ["string", "string"], "isCurrent": boolean }} ],
  "education": [ {{ "id": "string", "institution": "string", "degree": "string", "fieldOfStudy": "string", "graduationDate": "string", "gpa": "string" }} ],
  "skills": [ {{ "id": "string", "name": "string", "category": "string" }} ],
  "customSections": [ {{ "id": "string", "title": "string", "content": "string" }} ],
  "targetRole": "string",
  "targetIndustry": "string"
}}"#,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::Skill;

    fn sample_document() -> ResumeDocument {
        ResumeDocument {
            target_role: Some("Backend Engineer".into()),
            target_industry: Some("Fintech".into()),
            skills: vec![Skill {
                id: "s1".into(),
                name: "Rust".into(),
                category: "Technical".into(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_request_is_plain_text() {
        let request = build_request(&AiOperation::Summary, &sample_document()).unwrap();
        assert!(!request.structured_output);
        assert!(!request.grounded_search);
        assert!(request.prompt.contains("Backend Engineer"));
        assert!(request.prompt.contains("Fintech"));
        assert!(request.prompt.contains("Rust"));
    }

    #[test]
    fn test_summary_falls_back_to_generic_role() {
        let request = build_request(&AiOperation::Summary, &ResumeDocument::default()).unwrap();
        assert!(request.prompt.contains("professional"));
    }

    #[test]
    fn test_experience_rewrite_embeds_entry_context() {
        let mut doc = sample_document();
        doc.experience.push(Experience {
            id: "e1".into(),
            job_title: "Platform Engineer".into(),
            company: "Acme".into(),
            responsibilities: vec!["Ran deploys".into(), "On-call".into()],
            ..Default::default()
        });
        let request =
            build_request(&AiOperation::ExperienceRewrite { index: 0 }, &doc).unwrap();
        assert!(request.prompt.contains("Platform Engineer"));
        assert!(request.prompt.contains("Acme"));
        assert!(request.prompt.contains("Ran deploys; On-call"));
        assert!(!request.structured_output);
    }

    #[test]
    fn test_experience_rewrite_rejects_bad_index() {
        let err = build_request(&AiOperation::ExperienceRewrite { index: 3 }, &sample_document())
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_keywords_request_is_structured() {
        let request = build_request(&AiOperation::Keywords, &sample_document()).unwrap();
        assert!(request.structured_output);
        assert!(request.prompt.contains("actionVerbs"));
    }

    #[test]
    fn test_job_match_requires_description() {
        let err = build_request(
            &AiOperation::JobMatch {
                job_description: "  ".into(),
            },
            &sample_document(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let ok = build_request(
            &AiOperation::JobMatch {
                job_description: "Senior Rust engineer, 5 years".into(),
            },
            &sample_document(),
        )
        .unwrap();
        assert!(ok.prompt.contains("Senior Rust engineer"));
    }

    #[test]
    fn test_recent_trends_is_grounded() {
        let request = build_request(&AiOperation::RecentTrends, &sample_document()).unwrap();
        assert!(request.grounded_search);
        assert!(!request.structured_output);
    }

    #[test]
    fn test_auto_tailor_requires_role() {
        let err = build_request(
            &AiOperation::AutoTailor {
                desired_role: String::new(),
            },
            &sample_document(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_auto_tailor_embeds_document_and_structure() {
        let request = build_request(
            &AiOperation::AutoTailor {
                desired_role: "Staff Engineer".into(),
            },
            &sample_document(),
        )
        .unwrap();
        assert!(request.structured_output);
        assert!(request.prompt.contains("Staff Engineer"));
        // The serialized document and the expected output structure are embedded.
        assert!(request.prompt.contains("\"targetRole\":\"Backend Engineer\""));
        assert!(request.prompt.contains("\"customSections\": ["));
    }
}
