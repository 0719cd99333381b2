use crate::domain::error::DomainError;
use crate::domain::repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error("corrupt store: {0}")]
    CorruptStore(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("storage error: {0}")]
    Io(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AppError {
    /// Store実装のエラーを破損 / I/O に振り分ける。
    pub fn from_store<E: RepositoryError>(e: E) -> Self {
        if e.is_corrupt() {
            Self::CorruptStore(Box::new(e))
        } else {
            Self::Io(Box::new(e))
        }
    }
}
