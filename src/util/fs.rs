use crate::error::{QEditError, QEditResult};
use async_recursion::async_recursion;
use std::path::{Path, PathBuf};
use tokio::fs;

const CUE_EXTENSION: &str = "cue";

#[async_recursion]
pub async fn get_all_files(dir_path: &Path, recursive: bool) -> QEditResult<Vec<PathBuf>> {
    let mut dir = fs::read_dir(dir_path).await?;
    let mut files = Vec::new();

    while let Some(entry) = dir.next_entry().await? {
        let path = entry.path();

        if path.is_dir() {
            if recursive {
                files.append(&mut get_all_files(&path, recursive).await?);
            }
        } else {
            files.push(path);
        }
    }

    Ok(files)
}

pub fn is_cue_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case(CUE_EXTENSION))
}

/// Expands each input into cuesheet paths. Files are taken as given, while
/// directories contribute the `.cue` files inside them, sorted by path.
pub async fn find_cue_files(inputs: &[PathBuf], recursive: bool) -> QEditResult<Vec<PathBuf>> {
    let mut cue_files = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            cue_files.push(input.clone());
            continue;
        }

        let mut found: Vec<_> = get_all_files(input, recursive)
            .await?
            .into_iter()
            .filter(|file| is_cue_file(file))
            .collect();

        if found.is_empty() {
            return Err(QEditError::NoCueSheetFound(input.clone()));
        }

        found.sort();
        cue_files.append(&mut found);
    }

    Ok(cue_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        std_fs::write(path, b"").unwrap();
    }

    #[test]
    fn matches_cue_extension_in_any_case() {
        assert!(is_cue_file(Path::new("album.cue")));
        assert!(is_cue_file(Path::new("ALBUM.CUE")));
        assert!(!is_cue_file(Path::new("album.bin")));
        assert!(!is_cue_file(Path::new("cue")));
    }

    #[tokio::test]
    async fn walks_subdirectories_only_when_recursive() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("disc2");
        std_fs::create_dir(&nested).unwrap();
        touch(&dir.path().join("b.cue"));
        touch(&dir.path().join("a.cue"));
        touch(&dir.path().join("a.bin"));
        touch(&nested.join("c.cue"));

        let inputs = vec![dir.path().to_path_buf()];

        let flat = find_cue_files(&inputs, false).await.unwrap();
        assert_eq!(flat, vec![dir.path().join("a.cue"), dir.path().join("b.cue")]);

        let deep = find_cue_files(&inputs, true).await.unwrap();
        assert_eq!(deep.len(), 3);
        assert!(deep.contains(&nested.join("c.cue")));
    }

    #[tokio::test]
    async fn reports_directories_without_cuesheets() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("track.wav"));

        let result = find_cue_files(&[dir.path().to_path_buf()], true).await;
        assert!(matches!(result, Err(QEditError::NoCueSheetFound(path)) if path == dir.path()));
    }

    #[tokio::test]
    async fn keeps_plain_file_inputs() {
        let inputs = vec![PathBuf::from("missing.cue")];
        assert_eq!(find_cue_files(&inputs, false).await.unwrap(), inputs);
    }
}
