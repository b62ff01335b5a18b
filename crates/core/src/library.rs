//! The downloads directory as seen by clients: listing and clearing files.

use std::path::Path;

use serde::Serialize;

use crate::types::Timestamp;

/// URL prefix under which downloaded files are served.
pub const DOWNLOADS_URL_PREFIX: &str = "/downloads";

/// One file in the downloads directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredFile {
    pub filename: String,
    pub size: u64,
    pub created: Option<Timestamp>,
    #[serde(rename = "downloadUrl")]
    pub download_url: String,
}

/// List regular files in `dir`, sorted by name.
pub async fn list_files(dir: &Path) -> std::io::Result<Vec<StoredFile>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().into_owned();
        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .ok()
            .map(Timestamp::from);

        files.push(StoredFile {
            download_url: format!("{DOWNLOADS_URL_PREFIX}/{filename}"),
            filename,
            size: metadata.len(),
            created,
        });
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(files)
}

/// Delete every regular file in `dir`, returning how many were removed.
pub async fn clear_files(dir: &Path) -> std::io::Result<usize> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut removed = 0;

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            tokio::fs::remove_file(entry.path()).await?;
            removed += 1;
        }
    }

    Ok(removed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
