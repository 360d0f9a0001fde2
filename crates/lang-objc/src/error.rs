use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObjcError {
    #[error("Grammar is incompatible with the parser: {0}")]
    Language(String),
    #[error("Invalid query: {0}")]
    Query(String),
    #[error("Capture name '{0}' not found in SCM")]
    MissingCapture(String),
    #[error("Parser produced no tree")]
    NoTree,
}

pub type Result<T> = std::result::Result<T, ObjcError>;
