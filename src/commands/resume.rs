use std::sync::Arc;

use tauri::State;

use crate::error::AppError;
use crate::resume::{CustomSection, Education, Experience, ResumeDocument, Skill};
use crate::AppState;

#[tauri::command]
pub async fn get_resume(state: State<'_, Arc<AppState>>) -> Result<ResumeDocument, AppError> {
    Ok(state.document.lock().await.clone())
}

/// Whole-document replacement coming from the form editor. The id invariants
/// are re-checked so a buggy frontend cannot smuggle in duplicates.
#[tauri::command]
pub async fn replace_resume(
    state: State<'_, Arc<AppState>>,
    document: ResumeDocument,
) -> Result<ResumeDocument, AppError> {
    document.validate()?;
    let mut guard = state.document.lock().await;
    *guard = document;
    Ok(guard.clone())
}

/// Append a blank entry with a freshly generated id. Ids are only ever minted
/// here and in the merge engine, so the uniqueness invariant has two owners,
/// both backend-side.
#[tauri::command]
pub async fn append_experience(
    state: State<'_, Arc<AppState>>,
) -> Result<ResumeDocument, AppError> {
    let mut guard = state.document.lock().await;
    let mut next = guard.clone();
    next.experience.push(Experience::empty());
    *guard = next;
    Ok(guard.clone())
}

#[tauri::command]
pub async fn append_education(
    state: State<'_, Arc<AppState>>,
) -> Result<ResumeDocument, AppError> {
    let mut guard = state.document.lock().await;
    let mut next = guard.clone();
    next.education.push(Education::empty());
    *guard = next;
    Ok(guard.clone())
}

#[tauri::command]
pub async fn append_skill(state: State<'_, Arc<AppState>>) -> Result<ResumeDocument, AppError> {
    let mut guard = state.document.lock().await;
    let mut next = guard.clone();
    next.skills.push(Skill::empty());
    *guard = next;
    Ok(guard.clone())
}

#[tauri::command]
pub async fn append_custom_section(
    state: State<'_, Arc<AppState>>,
) -> Result<ResumeDocument, AppError> {
    let mut guard = state.document.lock().await;
    let mut next = guard.clone();
    next.custom_sections.push(CustomSection::empty());
    *guard = next;
    Ok(guard.clone())
}
