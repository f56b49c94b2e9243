use thiserror::Error;

use crate::params::FieldError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("mysqldump not found or not executable: {0}")]
    ToolNotFound(String),

    #[error("mysqldump exited with code {code}: {stderr}")]
    Execution { code: i32, stderr: String },

    #[error("Archiving failed: {0}")]
    Archive(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preferences file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, AppError>;
