use idhelper_core::error::CoreError;

/// Errors surfaced by table clients and the stores built on them.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Entity not found in {table}: ({partition_key}, {row_key})")]
    NotFound {
        table: String,
        partition_key: String,
        row_key: String,
    },

    #[error("Entity already exists in {table}: ({partition_key}, {row_key})")]
    Conflict {
        table: String,
        partition_key: String,
        row_key: String,
    },

    #[error("Etag mismatch in {table}: ({partition_key}, {row_key})")]
    PreconditionFailed {
        table: String,
        partition_key: String,
        row_key: String,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid entity: {0}")]
    Invalid(String),
}
