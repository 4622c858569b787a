//! Error types

mod api;
mod schema;

pub use api::*;
pub use schema::*;

/// Errors surfaced by the grid core.
///
/// Nothing here is fatal: a failed page leaves the grid usable and the
/// error is handed to the caller for display.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP backend failed or returned something unusable.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A non-HTTP fetcher reported a failure.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Column metadata could not be turned into a column model.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl Error {
    /// Creates a fetch error from any displayable message.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch(message.into())
    }

    /// Returns the HTTP status code if the backend answered with an error status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code() {
        let err: Error = ApiError::http(503, "Service Unavailable").into();
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(Error::fetch("timeout").status_code(), None);
    }

    #[test]
    fn test_schema_error_is_transparent() {
        let err: Error = SchemaError::DuplicateId("data.energy".into()).into();
        assert_eq!(err.to_string(), "Duplicate column id 'data.energy'");
    }
}
