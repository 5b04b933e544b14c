//! Collaborator seams: document, blob and schedule storage.

pub mod blob;
pub mod document;
pub mod schedule;
#[cfg(test)]
mod tests;

pub use blob::{BlobStore, LocalBlobStore, UploadProgress};
pub use document::{DocSnapshot, Document, DocumentStore, JsonDocumentStore, Subscription};
pub use schedule::{JsonScheduleStore, SavedCell, SavedSchedule, ScheduleStore};

use crate::errors::{Error, Result};

/// Collection and blob path segments are restricted to a safe file-name alphabet.
pub(crate) fn check_segment(kind: &str, name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::store(format!("Invalid {kind} name: '{name}'.")))
    }
}
