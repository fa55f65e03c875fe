use crate::cue::error::CueError;
use crate::edit::error::EditError;
use std::path::PathBuf;
use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QEditError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    CueError(#[from] CueError),

    #[error(transparent)]
    EditError(#[from] EditError),

    #[error("Could not find any cuesheet in the specified path: {0}")]
    NoCueSheetFound(PathBuf),

    #[error("{0} of {1} cuesheets failed the check")]
    CheckFailed(usize, usize),
}

pub type QEditResult<T> = result::Result<T, QEditError>;
