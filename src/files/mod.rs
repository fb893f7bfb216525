//! Gated access to uploaded file records. Every operation here requires a
//! resolved [`Identity`] — the gate has already run by the time these are
//! called.

pub mod decode;
pub mod format;

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::gate::Identity;
use crate::errors::AppError;
use crate::store::{FileRecord, FileStore};
use decode::DecoderRegistry;
use format::FileFormat;

/// One row of tabular data: column name → scalar or null.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Mediates create/read operations against the file record store.
///
/// Access is flat: any authenticated identity may fetch any record by id.
/// Records carry no owner field.
#[derive(Clone)]
pub struct FileController {
    store: Arc<dyn FileStore>,
    decoders: Arc<DecoderRegistry>,
}

impl FileController {
    pub fn new(store: Arc<dyn FileStore>, decoders: Arc<DecoderRegistry>) -> Self {
        Self { store, decoders }
    }

    /// Decode and persist an upload. The extension is validated against
    /// the supported set before any decoding happens; the decoder lookup
    /// then branches on the same [`FileFormat`] value.
    pub async fn upload(
        &self,
        identity: &Identity,
        filename: &str,
        bytes: &[u8],
    ) -> Result<FileRecord, AppError> {
        let format = FileFormat::from_filename(filename).ok_or_else(|| {
            let ext = filename.rsplit_once('.').map(|(_, e)| e).unwrap_or(filename);
            AppError::UnsupportedFormat(ext.to_string())
        })?;

        let data = self.decoders.decode(format, bytes)?;

        let record = FileRecord {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            data,
        };
        self.store.insert_file(&record).await?;

        tracing::info!(
            user = %identity.user.username,
            file_id = %record.id,
            format = %format,
            rows = record.data.len(),
            "file uploaded"
        );
        Ok(record)
    }

    /// Exact-id lookup. An id that does not parse as a Uuid cannot name a
    /// record, so callers map that case to [`AppError::NotFound`] too.
    pub async fn fetch(&self, identity: &Identity, file_id: Uuid) -> Result<FileRecord, AppError> {
        let record = self
            .store
            .find_by_id(file_id)
            .await?
            .ok_or(AppError::NotFound)?;

        tracing::debug!(
            user = %identity.user.username,
            file_id = %file_id,
            "file fetched"
        );
        Ok(record)
    }
}
