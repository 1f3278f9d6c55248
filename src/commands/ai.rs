use std::sync::Arc;

use tauri::State;

use crate::engine::merge::{self, MergeOutcome};
use crate::engine::prompt;
use crate::engine::types::{AiOperation, AiOutcome};
use crate::error::AppError;
use crate::AppState;

/// Shared driver for every AI operation: build the prompt from a snapshot,
/// call the gateway, then merge against the live document under the lock.
/// The lock is never held across the gateway call.
async fn run_operation(state: &AppState, op: AiOperation) -> Result<AiOutcome, AppError> {
    let request = {
        let guard = state.document.lock().await;
        prompt::build_request(&op, &guard)?
    };

    tracing::info!(
        operation = op.name(),
        structured = request.structured_output,
        grounded = request.grounded_search,
        "Dispatching AI operation"
    );

    let reply = state.gateway.generate(&request).await?;

    let mut guard = state.document.lock().await;
    match merge::apply(&op, &guard, &reply)? {
        MergeOutcome::Replace { document, response } => {
            *guard = document.clone();
            tracing::info!(operation = op.name(), "AI merge applied");
            Ok(AiOutcome {
                response: response.unwrap_or_default(),
                citations: reply.citations,
                document: Some(document),
            })
        }
        MergeOutcome::Display(response) => {
            tracing::info!(operation = op.name(), "AI result packaged for display");
            Ok(AiOutcome {
                response,
                citations: reply.citations,
                document: None,
            })
        }
    }
}

#[tauri::command]
pub async fn generate_summary(state: State<'_, Arc<AppState>>) -> Result<AiOutcome, AppError> {
    run_operation(&state, AiOperation::Summary).await
}

#[tauri::command]
pub async fn rewrite_experience(
    state: State<'_, Arc<AppState>>,
    index: usize,
) -> Result<AiOutcome, AppError> {
    run_operation(&state, AiOperation::ExperienceRewrite { index }).await
}

#[tauri::command]
pub async fn extract_keywords(state: State<'_, Arc<AppState>>) -> Result<AiOutcome, AppError> {
    run_operation(&state, AiOperation::Keywords).await
}

#[tauri::command]
pub async fn run_ats_check(state: State<'_, Arc<AppState>>) -> Result<AiOutcome, AppError> {
    run_operation(&state, AiOperation::AtsCheck).await
}

#[tauri::command]
pub async fn match_job_description(
    state: State<'_, Arc<AppState>>,
    job_description: String,
) -> Result<AiOutcome, AppError> {
    run_operation(&state, AiOperation::JobMatch { job_description }).await
}

#[tauri::command]
pub async fn suggest_section_content(
    state: State<'_, Arc<AppState>>,
    section_name: String,
    existing_content: Option<String>,
) -> Result<AiOutcome, AppError> {
    run_operation(
        &state,
        AiOperation::SmartSuggestions {
            section_name,
            existing_content,
        },
    )
    .await
}

#[tauri::command]
pub async fn fetch_recent_trends(state: State<'_, Arc<AppState>>) -> Result<AiOutcome, AppError> {
    run_operation(&state, AiOperation::RecentTrends).await
}

#[tauri::command]
pub async fn auto_tailor_resume(
    state: State<'_, Arc<AppState>>,
    desired_role: String,
) -> Result<AiOutcome, AppError> {
    run_operation(&state, AiOperation::AutoTailor { desired_role }).await
}
