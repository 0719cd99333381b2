#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid year: '{0}' is not an integer")]
    InvalidYear(String),

    #[error("year {year} out of range ({min}-{max})")]
    YearOutOfRange { year: i64, min: i32, max: i32 },
}
