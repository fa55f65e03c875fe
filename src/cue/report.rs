use crate::commands::CheckCommand;
use crate::cue::CueParser;
use crate::cue::error::Diagnostic;
use crate::error::{QEditError, QEditResult};
use crate::util::fs::find_cue_files;
use indicatif::{MultiProgress, ProgressBar};
use log::{debug, error, info};
use std::path::Path;

/// `subject: problem` followed by the indented remedy.
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    format!("{diagnostic}\n    {}", diagnostic.remedy)
}

/// Lines printed for one checked cuesheet; empty when nothing was found.
pub fn format_report(path: &Path, diagnostics: &[Diagnostic]) -> Vec<String> {
    if diagnostics.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![format!("{}:", path.display())];
    lines.extend(
        diagnostics
            .iter()
            .map(|diagnostic| format!("  {}", format_diagnostic(diagnostic).replace('\n', "\n  "))),
    );
    lines
}

/// Checks every cuesheet the command names. Fails with
/// [`QEditError::CheckFailed`] if any sheet could not be parsed or has
/// problems.
pub async fn check_cue_sheets(multi: MultiProgress, cmd: CheckCommand) -> QEditResult<()> {
    let cue_files = find_cue_files(&cmd.inputs, cmd.recursive).await?;
    let progress = multi.add(ProgressBar::new(cue_files.len() as u64));
    let mut failed = 0;

    for cue_file in &cue_files {
        debug!("Checking {:?}", cue_file);

        match CueParser::new(cue_file).parse().await {
            Ok(cue_sheet) => {
                let diagnostics = cue_sheet.validate();
                if !diagnostics.is_empty() {
                    failed += 1;
                }
                for line in format_report(cue_file, &diagnostics) {
                    multi.println(line)?;
                }
            }
            Err(err) => {
                failed += 1;
                error!("{}: {err}", cue_file.display());
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();
    multi.remove(&progress);

    if failed > 0 {
        return Err(QEditError::CheckFailed(failed, cue_files.len()));
    }

    info!("Checked {} cuesheets, no problems found", cue_files.len());
    Ok(())
}
