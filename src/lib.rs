pub mod commands;
pub mod db;
pub mod engine;
pub mod error;
pub mod logging;
pub mod resume;
pub mod validation;

use std::sync::Arc;

use tauri::Manager;
use tokio::sync::Mutex;

use db::DbPool;
use engine::gateway::GeminiClient;
use resume::ResumeDocument;

/// Shared application state accessible from all Tauri commands.
///
/// The resume document is single-writer: the form editor (via
/// `replace_resume`) and the merge engine are the only mutators, and both
/// swap in a whole new value, so the preview never reads a torn state.
pub struct AppState {
    pub db: DbPool,
    pub document: Mutex<ResumeDocument>,
    pub gateway: GeminiClient,
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    dotenvy::dotenv().ok();
    logging::init();

    tracing::info!("Starting Resume Architect v{}", env!("CARGO_PKG_VERSION"));

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let app_data_dir = app
                .path()
                .app_data_dir()
                .expect("Failed to resolve app data directory");

            let pool = db::init_db(&app_data_dir)?;

            let gateway = GeminiClient::from_env();
            if !gateway.has_credential() {
                tracing::warn!(
                    "GEMINI_API_KEY is not set; AI operations will fail until it is configured"
                );
            }

            // The document starts from empty defaults and lives only in
            // memory; nothing resume-shaped is ever persisted.
            let state = Arc::new(AppState {
                db: pool,
                document: Mutex::new(ResumeDocument::default()),
                gateway,
            });
            app.manage(state);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::resume::get_resume,
            commands::resume::replace_resume,
            commands::resume::append_experience,
            commands::resume::append_education,
            commands::resume::append_skill,
            commands::resume::append_custom_section,
            commands::ai::generate_summary,
            commands::ai::rewrite_experience,
            commands::ai::extract_keywords,
            commands::ai::run_ats_check,
            commands::ai::match_job_description,
            commands::ai::suggest_section_content,
            commands::ai::fetch_recent_trends,
            commands::ai::auto_tailor_resume,
            commands::settings::get_dark_mode,
            commands::settings::set_dark_mode,
            commands::export::suggest_export_filename,
            commands::export::export_html,
            commands::export::export_pdf,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
