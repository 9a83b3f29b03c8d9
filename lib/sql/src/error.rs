use thiserror::Error;

/// Errors from the SQL storage layer.
#[derive(Error, Debug)]
pub enum SQLError {
    /// Failed to open or configure the database.
    #[error("connection error: {0}")]
    Connection(String),

    /// A query failed to prepare or run.
    #[error("query error: {0}")]
    Query(String),

    /// A write statement failed.
    #[error("execution error: {0}")]
    Execution(String),

    /// A transactional batch failed and was rolled back.
    #[error("transaction error: {0}")]
    Transaction(String),
}

impl SQLError {
    /// Whether this error reports a violated UNIQUE constraint.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, SQLError::Execution(msg) | SQLError::Transaction(msg)
            if msg.contains("UNIQUE constraint"))
    }
}
