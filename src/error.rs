use crate::repo::RepoError;
use crate::storage::ImageStoreError;

/// Handler-level error kinds. Every variant collapses to the same generic
/// HTTP 500 envelope at the handler boundary; the detail is only logged.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid request: {0}")] Validation(String),
    #[error("unexpected data shape: {0}")] Schema(String),
    #[error("storage failure: {0}")] Storage(String),
}

impl From<RepoError> for Error {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Schema(msg) => Error::Schema(msg),
            // Callers get the same generic 500 whether the key existed or not
            RepoError::NotFound => Error::Storage("record not found".into()),
            RepoError::Store(msg) => Error::Storage(msg),
        }
    }
}

impl From<ImageStoreError> for Error {
    fn from(e: ImageStoreError) -> Self {
        Error::Storage(e.to_string())
    }
}
