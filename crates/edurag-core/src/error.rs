//! Error types for EduRAG

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EduragError {
    // Ingestion errors
    #[error("course_id must be a non-empty string")]
    InvalidCourseId,

    #[error("No {doc_type} documents provided. At least one is required")]
    MissingDocuments { doc_type: String },

    // Bundle errors
    #[error("No course bundle built. Run 'edurag ingest' first")]
    BundleNotBuilt,

    #[error("No solutions in the style brain. Ensure style documents include solved exams")]
    SolutionsBankEmpty,

    // Retrieval errors
    #[error("Query must not be empty")]
    EmptyQuery,

    // Model errors
    #[error("Chat model unavailable: {reason}. Try: {remediation}")]
    ModelUnavailable {
        reason: String,
        remediation: String,
    },

    #[error("Malformed model reply: {reason}")]
    MalformedReply { reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, EduragError>;
