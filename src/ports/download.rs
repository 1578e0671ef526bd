//! Download sink that writes attachments into a directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

use super::DownloadSink;

/// Writes each blob to `<dir>/<filename>`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn save(&self, filename: &str, blob: Bytes) -> std::io::Result<PathBuf> {
        // Server-supplied names never leave the target directory.
        let name = Path::new(filename)
            .file_name()
            .map_or_else(|| crate::disposition::DEFAULT_FILENAME.into(), std::ffi::OsStr::to_os_string);
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, &blob).await?;
        info!(path = %path.display(), bytes = blob.len(), "Download saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("out"));
        let path = sink.save("report.docx", Bytes::from_static(b"PK")).await.unwrap();
        assert_eq!(path, dir.path().join("out").join("report.docx"));
        assert_eq!(std::fs::read(path).unwrap(), b"PK");
    }

    #[tokio::test]
    async fn strips_directories_from_name() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        let path = sink.save("../x.md", Bytes::from_static(b"# x")).await.unwrap();
        assert_eq!(path, dir.path().join("x.md"));
    }
}
