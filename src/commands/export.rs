//! Export adapter boundary.
//!
//! The frontend owns rendering and rasterization; these commands only receive
//! the finished artifacts (a rendered HTML fragment, or already-rasterized
//! PDF bytes) and write them to the user-chosen path. Export failures never
//! touch the resume document.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tauri::State;

use crate::error::AppError;
use crate::validation::require_non_empty;
use crate::AppState;

/// Default download name derived from the resume's full name.
#[tauri::command]
pub async fn suggest_export_filename(
    state: State<'_, Arc<AppState>>,
    extension: String,
) -> Result<String, AppError> {
    let full_name = state.document.lock().await.personal_info.full_name.clone();
    Ok(suggested_filename(&full_name, &extension))
}

/// Wrap the rendered preview fragment into a self-contained HTML document and
/// write it to `path`.
#[tauri::command]
pub async fn export_html(
    state: State<'_, Arc<AppState>>,
    rendered_html: String,
    path: String,
) -> Result<String, AppError> {
    require_non_empty("export path", &path)?;
    let title = {
        let guard = state.document.lock().await;
        let name = guard.personal_info.full_name.trim().to_string();
        if name.is_empty() {
            "Resume".to_string()
        } else {
            name
        }
    };
    let html = standalone_html(&rendered_html, &title);
    std::fs::write(&path, html)?;
    tracing::info!(path = %path, "Exported resume as standalone HTML");
    Ok(path)
}

/// Write frontend-rasterized PDF bytes (base64-encoded) to `path`.
#[tauri::command]
pub async fn export_pdf(pdf_base64: String, path: String) -> Result<String, AppError> {
    require_non_empty("export path", &path)?;
    let bytes = BASE64
        .decode(pdf_base64.as_bytes())
        .map_err(|e| AppError::Validation(format!("Invalid PDF payload: {e}")))?;
    std::fs::write(&path, bytes)?;
    tracing::info!(path = %path, "Exported resume as PDF");
    Ok(path)
}

fn suggested_filename(full_name: &str, extension: &str) -> String {
    let base: String = full_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let base = base.trim();
    let base = if base.is_empty() { "resume" } else { base };
    format!("{base}.{extension}")
}

fn standalone_html(fragment: &str, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <script src="https://cdn.tailwindcss.com"></script>
  <style>
    body {{ margin: 0; font-family: sans-serif; }}
  </style>
</head>
<body>
{fragment}
</body>
</html>
"#
    )
}
