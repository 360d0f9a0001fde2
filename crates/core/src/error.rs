use docscope_api::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No source units were supplied")]
    EmptyInput,
    #[error("Source `{file}` could not be read: {reason}")]
    UnreadableSource { file: String, reason: String },
    #[error("No frontend can handle `{file}`")]
    NoFrontend { file: String },
    #[error("Frontend `{language}` failed to initialize: {reason}")]
    FrontendInit { language: String, reason: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ApiError> for DocscopeError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidEncoding { file, reason } => {
                DocscopeError::UnreadableSource { file, reason }
            }
            other => DocscopeError::Internal(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocscopeError>;
