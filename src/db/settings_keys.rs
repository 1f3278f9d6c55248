/// Canonical settings key constants for the `app_settings` table.
///
/// Use these instead of raw string literals to prevent typo-based key mismatches.

/// Dark mode UI preference, string-encoded `"true"`/`"false"`.
pub const DARK_MODE: &str = "darkMode";
