use roster_core::types::DbId;

/// Errors produced by the data-access layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A database error from sqlx.
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// Credential resolution failed (bad env var, missing or malformed secret).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A partial update carried no fields. No statement was issued.
    #[error("No fields to update")]
    NoFieldsToUpdate,

    /// The row written by an insert was gone on the follow-up read.
    /// Either a logic error or a racing delete.
    #[error("Student {id} missing after write")]
    NotFoundAfterWrite { id: DbId },
}
