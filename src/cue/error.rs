use crate::cd::pad_two_digits;
use crate::cue::models::Charset;
use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    MalformedStatement,
    InvalidTimeCode,
    InvalidCatalog,
    InvalidIsrc,
    UnbalancedQuotation,
    MissingOrInconsistentNumbering,
    OutOfOrderTimeCode,
    ReferencedFileMissing,
    ReferencedPathIsDirectory,
}

impl ProblemKind {
    pub fn default_remedy(&self) -> &'static str {
        match self {
            ProblemKind::MalformedStatement => {
                "Correct the line so that it starts with a known command followed by its arguments."
            }
            ProblemKind::InvalidTimeCode => {
                "Write the time code as MM:SS:FF with two digits per field and fewer than 75 frames."
            }
            ProblemKind::InvalidCatalog => {
                "Correct it such that it is exactly 13 alphanumeric characters."
            }
            ProblemKind::InvalidIsrc => {
                "Correct it such that the first five characters are alphanumeric, and the last seven are numeric only."
            }
            ProblemKind::UnbalancedQuotation => {
                "Enclose it in quotation marks (\"), or check for \"open quotes that must be closed.\""
            }
            ProblemKind::MissingOrInconsistentNumbering => {
                "Renumber the entries so that they are consecutive and within range."
            }
            ProblemKind::OutOfOrderTimeCode => {
                "Reorder the entries or correct the time code so that it does not go backwards."
            }
            ProblemKind::ReferencedFileMissing => {
                "Place the file next to the cuesheet or correct the path."
            }
            ProblemKind::ReferencedPathIsDirectory => {
                "Point the path at a regular file instead of a directory."
            }
        }
    }
}

/// A single finding about a cuesheet: what is affected, what is wrong with
/// it, and how to fix it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{subject}: {problem}")]
pub struct Diagnostic {
    pub kind: ProblemKind,
    pub subject: String,
    pub problem: String,
    pub remedy: String,
}

impl Diagnostic {
    pub fn new(kind: ProblemKind, subject: impl Into<String>, problem: impl Display) -> Self {
        Self {
            kind,
            subject: subject.into(),
            problem: problem.to_string(),
            remedy: kind.default_remedy().to_string(),
        }
    }
}

pub const SESSION_SUBJECT: &str = "Session";

pub fn track_subject(track: u32) -> String {
    format!("TRACK {}", pad_two_digits(track as i64))
}

pub fn index_subject(track: u32, index: u32) -> String {
    format!("{} INDEX {}", track_subject(track), pad_two_digits(index as i64))
}

#[derive(Debug, Error)]
pub enum CueError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("line {line}: {diagnostic}")]
    Syntax { line: usize, diagnostic: Diagnostic },

    #[error("Cuesheet path is a directory: {0}")]
    IsDirectory(PathBuf),

    #[error("Character {character:?} cannot be encoded as {charset}")]
    Unencodable { character: char, charset: Charset },
}

pub type CueResult<T> = Result<T, CueError>;
