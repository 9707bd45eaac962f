//! Plain-text export of generated content.

use crate::kind::ContentKind;
use crate::ledger::HistoryEntry;
use chrono::{DateTime, TimeZone};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Errors from export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} already holds different content")]
    Exists { path: PathBuf },
}

/// File name for exported content: `{kind}_{YYYYMMDD_HHMMSS}.txt`.
pub fn export_filename<Tz: TimeZone>(kind: ContentKind, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}.txt", kind.tag(), at.format("%Y%m%d_%H%M%S"))
}

/// Write `content` verbatim into `dir`, creating the directory if needed.
///
/// Exporting the same text twice is a no-op. An existing file with
/// different content is left alone and reported as [`ExportError::Exists`].
pub async fn export_text<Tz: TimeZone>(
    dir: impl AsRef<Path>,
    kind: ContentKind,
    content: &str,
    at: &DateTime<Tz>,
) -> Result<PathBuf, ExportError>
where
    Tz::Offset: std::fmt::Display,
{
    let dir = dir.as_ref();
    fs::create_dir_all(dir).await.map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(export_filename(kind, at));
    let io_err = |source: std::io::Error| ExportError::Io {
        path: path.clone(),
        source,
    };

    match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
        Ok(mut file) => {
            file.write_all(content.as_bytes()).await.map_err(io_err)?;
            file.flush().await.map_err(io_err)?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            let existing = fs::read(&path).await.map_err(io_err)?;
            if existing != content.as_bytes() {
                tracing::warn!(path = %path.display(), "export target holds other content");
                return Err(ExportError::Exists { path: path.clone() });
            }
        }
        Err(source) => return Err(io_err(source)),
    }

    tracing::info!(path = %path.display(), bytes = content.len(), "exported content");
    Ok(path)
}

/// Export a history entry, named after the time it was generated.
pub async fn export_entry(dir: impl AsRef<Path>, entry: &HistoryEntry) -> Result<PathBuf, ExportError> {
    export_text(dir, entry.kind, &entry.content, &entry.timestamp).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_export_filename_pattern() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(export_filename(ContentKind::Story, &at), "story_20240309_070501.txt");
        assert_eq!(export_filename(ContentKind::Poem, &at), "poem_20240309_070501.txt");
    }

    #[tokio::test]
    async fn test_export_writes_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports");
        let at = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        let content = "  Line one\n\nLine three  \n";

        let path = export_text(&nested, ContentKind::Dialogue, content, &at)
            .await
            .unwrap();

        assert_eq!(path, nested.join("dialogue_20251231_235959.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[tokio::test]
    async fn test_same_second_export_keeps_first_file() {
        let dir = tempfile::tempdir().unwrap();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();

        let path = export_text(dir.path(), ContentKind::Poem, "first poem", &at)
            .await
            .unwrap();
        let err = export_text(dir.path(), ContentKind::Poem, "second poem", &at)
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Exists { path: ref p } if *p == path));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first poem");
    }

    #[tokio::test]
    async fn test_reexport_same_text_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();

        let first = export_text(dir.path(), ContentKind::Story, "once", &at).await.unwrap();
        let again = export_text(dir.path(), ContentKind::Story, "once", &at).await.unwrap();

        assert_eq!(first, again);
        assert_eq!(std::fs::read_to_string(&again).unwrap(), "once");
    }
}
