use std::sync::Arc;

use tauri::State;

use crate::db::repos::settings as repo;
use crate::db::settings_keys;
use crate::error::AppError;
use crate::AppState;

/// Read the persisted dark-mode preference. `None` means the user never
/// toggled it and the frontend should follow the OS scheme.
#[tauri::command]
pub fn get_dark_mode(state: State<'_, Arc<AppState>>) -> Result<Option<bool>, AppError> {
    Ok(repo::get(&state.db, settings_keys::DARK_MODE)?.map(|v| v == "true"))
}

#[tauri::command]
pub fn set_dark_mode(state: State<'_, Arc<AppState>>, enabled: bool) -> Result<(), AppError> {
    repo::set(
        &state.db,
        settings_keys::DARK_MODE,
        if enabled { "true" } else { "false" },
    )
}
