use thiserror::Error;

/// Failures raised while reading or writing the persisted document.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Reasons an externally supplied backup is refused. The current document is
/// never touched when one of these is returned.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not read backup file: {0}")]
    Unreadable(#[from] std::io::Error),
    #[error("backup is not a valid document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("backup must be a JSON object")]
    NotAnObject,
    #[error("backup is missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("backup contains duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
}

/// Form-level input problems. These block a mutation before any state changes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("date is required")]
    MissingDate,
    #[error("invalid date `{0}`")]
    InvalidDate(String),
    #[error("{field} must be greater than zero")]
    NonPositiveValue { field: &'static str },
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    #[error("monthly goal must be a positive amount, got {0}")]
    InvalidGoal(f64),
    #[error("invalid month `{0}`, expected YYYY-MM")]
    InvalidMonthKey(String),
    #[error("{kind} id `{id}` already exists")]
    DuplicateId { kind: &'static str, id: String },
}
