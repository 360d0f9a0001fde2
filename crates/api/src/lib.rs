pub mod error;
pub mod frontend;
pub mod models;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use frontend::{AssociationConfig, LanguageFrontend};
pub use models::*;
