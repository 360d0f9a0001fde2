#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unknown entity kind: {0}")]
    UnknownKind(String),
    #[error("Source `{file}` is not valid UTF-8: {reason}")]
    InvalidEncoding { file: String, reason: String },
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
