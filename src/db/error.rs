/// Failures surfaced by the record store.
///
/// The `Display` text is the raw failure detail that ends up in the
/// `{"error": ...}` body of a 500 response, so keep it human readable.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// A required field was missing or empty.
    #[error("Path `{path}` is required.")]
    Validation { path: &'static str },

    /// A value could not be coerced to the field's type.
    #[error("Cast to {kind} failed for value \"{value}\" at path \"{path}\"")]
    Cast {
        kind: &'static str,
        value: String,
        path: &'static str,
    },

    /// Submitted fields that could not be read into a document at all.
    #[error("{detail}")]
    Malformed { detail: String },
}

impl StoreError {
    pub fn required(path: &'static str) -> Self {
        Self::Validation { path }
    }

    pub fn cast(kind: &'static str, path: &'static str, value: impl Into<String>) -> Self {
        Self::Cast {
            kind,
            value: value.into(),
            path,
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::Malformed {
            detail: detail.into(),
        }
    }
}
