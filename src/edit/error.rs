use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Malformed action: {0}")]
    UnknownAction(String),

    #[error("Insufficient options for action {0}")]
    MissingArgument(String),

    #[error("Malformed option for action {action}: {value}")]
    InvalidArgument { action: String, value: String },
}

pub type EditResult<T> = Result<T, EditError>;
