use crate::core::store::check_segment;
use crate::errors::{Error, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub transferred: u64,
    pub total: u64,
}

impl UploadProgress {
    /// Whole percent, 100 for an empty payload.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.transferred.min(self.total) * 100) / self.total) as u8
    }
}

pub trait BlobStore {
    /// Store `bytes` under the slash-separated `path` and return a download URL.
    fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        progress: &mut dyn FnMut(UploadProgress),
    ) -> Result<String>;
}

/// Blobs as plain files below a root directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    chunk_size: usize,
}

impl LocalBlobStore {
    pub const DEFAULT_CHUNK: usize = 64 * 1024;

    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            chunk_size: Self::DEFAULT_CHUNK,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let mut full = self.root.clone();
        let mut any = false;
        for segment in path.split('/') {
            check_segment("blob path", segment)?;
            full.push(segment);
            any = true;
        }
        if !any {
            return Err(Error::store("Blob path is empty."));
        }
        Ok(full)
    }
}

impl BlobStore for LocalBlobStore {
    fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        progress: &mut dyn FnMut(UploadProgress),
    ) -> Result<String> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Upload(format!("{}: {}", parent.display(), e)))?;
        }
        let mut file = File::create(&target)
            .map_err(|e| Error::Upload(format!("{}: {}", target.display(), e)))?;

        let total = bytes.len() as u64;
        let mut transferred = 0u64;
        progress(UploadProgress { transferred, total });
        for chunk in bytes.chunks(self.chunk_size) {
            file.write_all(chunk)
                .map_err(|e| Error::Upload(format!("{}: {}", target.display(), e)))?;
            transferred += chunk.len() as u64;
            progress(UploadProgress { transferred, total });
        }
        file.flush()?;

        Ok(format!("file://{}", target.display()))
    }
}
