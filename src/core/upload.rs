use crate::core::store::{BlobStore, Document, DocumentStore, UploadProgress};
use crate::errors::{Error, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::rc::Rc;

pub const UPLOADS_COLLECTION: &str = "uploadedFiles";
pub const DEFAULT_MAX_MB: u64 = 10;

/// Metadata document recorded after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    pub url: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
    pub uploaded_at: String,
    pub path: String,
}

pub struct AttachmentUploader {
    blobs: Rc<dyn BlobStore>,
    docs: Rc<dyn DocumentStore>,
    max_mb: u64,
}

impl AttachmentUploader {
    pub fn new(blobs: Rc<dyn BlobStore>, docs: Rc<dyn DocumentStore>, max_mb: u64) -> Self {
        Self {
            blobs,
            docs,
            max_mb,
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_mb.saturating_mul(1024 * 1024)
    }

    /// Size check, blob upload under `uploads/<millis>_<name>`, then the
    /// metadata document. `progress` receives whole percentages.
    pub fn upload(&self, file: &Path, progress: &mut dyn FnMut(u8)) -> Result<UploadedFile> {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .map(sanitize_name)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::Upload(format!("Not a file: {}", file.display())))?;
        let meta = fs::metadata(file)
            .map_err(|e| Error::Upload(format!("{}: {}", file.display(), e)))?;
        if !meta.is_file() {
            return Err(Error::Upload(format!("Not a file: {}", file.display())));
        }
        if meta.len() > self.max_bytes() {
            return Err(Error::validation(format!(
                "File size must be less than {}MB",
                self.max_mb
            )));
        }
        let bytes = fs::read(file).map_err(|e| Error::Upload(format!("{}: {}", file.display(), e)))?;

        let path = format!("uploads/{}_{}", Utc::now().timestamp_millis(), name);
        let mut last = None;
        let url = self
            .blobs
            .upload(&path, &bytes, &mut |p: UploadProgress| {
                let pct = p.percent();
                if last != Some(pct) {
                    last = Some(pct);
                    progress(pct);
                }
            })
            .map_err(|e| match e {
                Error::Upload(_) => e,
                other => Error::Upload(other.to_string()),
            })?;

        let record = UploadedFile {
            name,
            url,
            size: bytes.len() as u64,
            content_type: content_type_for(file).to_string(),
            uploaded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            path,
        };
        let doc: Document = match serde_json::to_value(&record)? {
            serde_json::Value::Object(map) => map,
            _ => return Err(Error::domain("Upload metadata is not an object.")),
        };
        self.docs
            .add(UPLOADS_COLLECTION, doc)
            .map_err(|e| Error::Upload(format!("Failed to complete upload: {e}")))?;
        Ok(record)
    }
}

/// Blob path segments allow only a safe alphabet; anything else becomes `_`.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

pub fn content_type_for(file: &Path) -> &'static str {
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "csv" => "text/csv",
        "txt" => "text/plain",
        "json" => "application/json",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}
