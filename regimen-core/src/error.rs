use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum Error {
    /// A record is missing a field the target table requires, or carries a malformed value.
    #[error("validation error: {0}")]
    Validation(String),

    /// The store rejected a statement (syntax, constraint, connectivity).
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// An insert that should have produced an identifier did not.
    #[error("integrity error: {0}")]
    Integrity(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    pub fn validation<D: std::fmt::Display>(d: D) -> Self {
        Error::Validation(d.to_string())
    }

    pub fn integrity<D: std::fmt::Display>(d: D) -> Self {
        Error::Integrity(d.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_store(&self) -> bool {
        matches!(self, Error::Store(_))
    }

    pub fn is_integrity(&self) -> bool {
        matches!(self, Error::Integrity(_))
    }
}
