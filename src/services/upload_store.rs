// Disk storage for uploaded resumes

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};

/// Public URL prefix under which stored files are served.
pub const UPLOADS_URL_PREFIX: &str = "uploads";

/// Metadata recorded on the application document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub filename: String,
    pub path: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create uploads directory {}", self.dir.display()))
    }

    /// `My Resume.PDF` uploaded at `t` becomes `my_resume_<t>.PDF`.
    /// Only the final path component of the client name is used.
    pub fn resume_file_name(original_name: &str, timestamp_millis: i64) -> String {
        let base: &str = original_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(original_name);

        let (stem, extension) = match base.rfind('.') {
            Some(index) if index > 0 => (&base[..index], &base[index..]),
            _ => (base, ""),
        };

        let stem: String = stem.to_lowercase().split(' ').collect::<Vec<&str>>().join("_");
        let stem: &str = if stem.is_empty() { "resume" } else { &stem };

        format!("{stem}_{timestamp_millis}{extension}")
    }

    /// Writes the upload and returns what the application document records.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        let filename: String =
            Self::resume_file_name(original_name, chrono::Utc::now().timestamp_millis());
        let target: PathBuf = self.dir.join(&filename);

        fs::write(&target, bytes)
            .await
            .with_context(|| format!("Failed to write upload {}", target.display()))?;

        info!("Stored upload {} ({} bytes)", filename, bytes.len());

        Ok(StoredFile {
            path: format!("{UPLOADS_URL_PREFIX}/{filename}"),
            size: bytes.len() as u64,
            filename,
        })
    }

    /// Holds a freshly stored file until the caller commits it. Dropping an
    /// uncommitted guard (an error return or a cancelled request) deletes it.
    pub fn pending(&self, stored: StoredFile) -> PendingUpload {
        PendingUpload {
            target: self.dir.join(&stored.filename),
            stored,
            committed: false,
        }
    }

    /// Deletes a stored file given the `path` recorded on the document.
    /// Failures are logged and reported as `false`; callers carry on.
    pub async fn remove(&self, recorded_path: &str) -> bool {
        let Some(filename) = Path::new(recorded_path).file_name() else {
            warn!("Ignoring resume path without a file name: {}", recorded_path);
            return false;
        };
        let target: PathBuf = self.dir.join(filename);

        match fs::remove_file(&target).await {
            Ok(()) => {
                info!("Resume file deleted: {}", recorded_path);
                true
            }
            Err(e) => {
                warn!("Failed to delete resume file {}: {}", target.display(), e);
                false
            }
        }
    }
}

/// A stored file whose database record has not been written yet.
#[derive(Debug)]
pub struct PendingUpload {
    target: PathBuf,
    stored: StoredFile,
    committed: bool,
}

impl PendingUpload {
    pub fn stored(&self) -> &StoredFile {
        &self.stored
    }

    /// Keeps the file on disk.
    pub fn commit(mut self) -> StoredFile {
        self.committed = true;
        self.stored.clone()
    }
}

impl Drop for PendingUpload {
    fn drop(&mut self) {
        if self.committed {
            return;
        }

        // Drop cannot await
        match std::fs::remove_file(&self.target) {
            Ok(()) => info!("Discarded uncommitted upload {}", self.stored.path),
            Err(e) => warn!("Failed to discard upload {}: {}", self.target.display(), e),
        }
    }
}
