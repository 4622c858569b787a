//! Column schema error types

/// Errors raised while building a column model from schema metadata.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A column had an empty name or an empty dotted segment.
    #[error("Invalid column name '{0}'")]
    InvalidName(String),

    /// Two columns resolved to the same id.
    #[error("Duplicate column id '{0}'")]
    DuplicateId(String),
}
