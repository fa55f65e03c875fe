use crate::cue::error::{CueError, CueResult};
use crate::cue::models::{Charset, CueSheet};
use log::debug;
use std::path::{Path, PathBuf};

pub mod error;
pub mod models;
pub mod parser;
pub mod quote;
pub mod reader;
pub mod report;
pub mod statement;
pub mod validator;

pub struct CueParser {
    cue_path: PathBuf,
}

impl CueParser {
    pub fn new(cue_path: impl AsRef<Path>) -> Self {
        Self {
            cue_path: cue_path.as_ref().to_path_buf(),
        }
    }

    pub async fn parse(&self) -> CueResult<CueSheet> {
        if tokio::fs::metadata(&self.cue_path).await?.is_dir() {
            return Err(CueError::IsDirectory(self.cue_path.clone()));
        }

        let data = tokio::fs::read(&self.cue_path).await?;
        let (text, charset) = Charset::decode(data);

        debug!("Read {:?} as {charset}", self.cue_path);

        let mut cue_sheet = parser::parse_str(&text)?;
        cue_sheet.charset = charset;
        cue_sheet.path = Some(self.cue_path.clone());

        Ok(cue_sheet)
    }
}

/// Serializes `cue_sheet` with its own line ending and charset and writes it
/// to `path`, replacing any existing file.
pub async fn write_cue_sheet(cue_sheet: &CueSheet, path: impl AsRef<Path>) -> CueResult<()> {
    let path = path.as_ref();
    if tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_dir())
    {
        return Err(CueError::IsDirectory(path.to_path_buf()));
    }

    let bytes = cue_sheet.charset.encode(&cue_sheet.render())?;
    tokio::fs::write(path, bytes).await?;

    debug!(
        "Wrote {:?} with {} line endings",
        path,
        cue_sheet.effective_line_ending()
    );
    Ok(())
}

/// Prints the cuesheet at `path` in canonical form.
pub async fn print_cue_sheet(path: &Path) -> CueResult<()> {
    let cue_sheet = CueParser::new(path).parse().await?;
    print!("{}", cue_sheet.render());
    Ok(())
}
