use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimeCodeError {
    #[error("Time code is shorter than 8 characters: {0}")]
    TooShort(String),

    #[error("Time code is not in MM:SS:FF format: {0}")]
    NotNumeric(String),

    #[error("Time code field is out of range: {0}")]
    OutOfRange(String),
}

pub type TimeCodeResult<T> = Result<T, TimeCodeError>;
