//! Tauri IPC surface. Commands delegate to the engine and the settings store;
//! no business logic lives here beyond locking and whole-value swaps.

pub mod ai;
pub mod export;
pub mod resume;
pub mod settings;
