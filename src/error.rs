use serde::Serialize;

/// App-wide error type. Every fallible function returns `Result<T, AppError>`.
/// Serializes cleanly for Tauri IPC so the frontend gets structured error messages.
///
/// The AI-facing variants mirror the failure taxonomy of the merge pipeline:
/// `Validation` is raised before any gateway call, `Service`/`Auth` come from
/// the gateway itself, and `Parse`/`Shape` mean the AI answered with something
/// the merge engine refused to trust. None of them leave the resume document
/// in a partially-updated state.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("AI service error: {0}")]
    Service(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Failed to parse AI response: {reason}. Raw: {excerpt}")]
    Parse { reason: String, excerpt: String },

    #[error("Unexpected AI response shape: {0}")]
    Shape(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Internal(String),
}

/// Tauri requires `Serialize` on command return errors.
/// We serialize as `{ error: "...", kind: "..." }` for frontend consumption.
/// The `auth` kind is the credential-invalid subtype the UI renders with its
/// own message pointing at the API key setup.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("error", &self.to_string())?;
        s.serialize_field(
            "kind",
            match self {
                AppError::Database(_) => "database",
                AppError::Pool(_) => "pool",
                AppError::Validation(_) => "validation",
                AppError::Service(_) => "service",
                AppError::Auth(_) => "auth",
                AppError::Parse { .. } => "parse",
                AppError::Shape(_) => "shape",
                AppError::Io(_) => "io",
                AppError::Serde(_) => "serde",
                AppError::Internal(_) => "internal",
            },
        )?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_kind() {
        let err = AppError::Auth("API key invalid".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "auth");
        assert!(json["error"].as_str().unwrap().contains("API key invalid"));
    }

    #[test]
    fn test_parse_error_carries_excerpt() {
        let err = AppError::Parse {
            reason: "expected value at line 1".into(),
            excerpt: "not json at all".into(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("expected value"));
        assert!(rendered.contains("not json at all"));
    }
}
