//! Outbound save contract: handing a finished annotation to whatever
//! persists, uploads or downloads it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::annotation::AnnotationRecord;

const DOWNLOAD_SUBDIR: &str = "Downloads";
const APP_SUBDIR: &str = "pagemark";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode annotation record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("delivery worker stopped before reporting a result")]
    WorkerLost,
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Everything a collaborator receives on save.
#[derive(Debug, Clone)]
pub struct SavePayload {
    pub record: AnnotationRecord,
    pub annotated_png: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeliveryReceipt {
    pub locations: Vec<PathBuf>,
}

pub trait AnnotationSink: Send + Sync {
    fn deliver(&self, payload: &SavePayload) -> StorageResult<DeliveryReceipt>;
}

/// Writes `<id>.json` with the full record and `<id>.png` with the
/// annotated bitmap into one directory.
#[derive(Debug, Clone)]
pub struct DownloadSink {
    dir: PathBuf,
}

impl DownloadSink {
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn with_default_dir() -> StorageResult<Self> {
        let home = std::env::var_os("HOME").ok_or(StorageError::MissingHomeDirectory)?;
        let mut dir = PathBuf::from(home);
        dir.push(DOWNLOAD_SUBDIR);
        dir.push(APP_SUBDIR);
        Ok(Self::with_dir(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    pub fn image_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.png"))
    }
}

impl AnnotationSink for DownloadSink {
    fn deliver(&self, payload: &SavePayload) -> StorageResult<DeliveryReceipt> {
        fs::create_dir_all(&self.dir)?;
        let id = payload.record.id.to_string();

        let image_path = self.image_path(&id);
        write_replacing(&image_path, &payload.annotated_png)?;

        let record_path = self.record_path(&id);
        let json = serde_json::to_vec_pretty(&payload.record)?;
        if let Err(err) = write_replacing(&record_path, &json) {
            let _ = fs::remove_file(&image_path);
            return Err(err);
        }

        tracing::info!(id = %id, dir = %self.dir.display(), "annotation written");
        Ok(DeliveryReceipt {
            locations: vec![record_path, image_path],
        })
    }
}

/// Writes through a sibling temp file so readers never see a partial file.
fn write_replacing(destination: &Path, bytes: &[u8]) -> StorageResult<()> {
    let mut temp = destination.as_os_str().to_owned();
    temp.push(".part");
    let temp = PathBuf::from(temp);
    fs::write(&temp, bytes)?;
    if let Err(err) = fs::rename(&temp, destination) {
        let _ = fs::remove_file(&temp);
        return Err(StorageError::Io(err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotationFields, PageInfo};
    use crate::editor::{Canvas, ImageBounds};
    use crate::export::CanvasData;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("pagemark-storage-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn payload() -> SavePayload {
        let record = AnnotationRecord::assemble(
            &PageInfo {
                url: "https://example.com".to_string(),
                title: "Example".to_string(),
            },
            &AnnotationFields::default(),
            "data:image/png;base64,AAAA".to_string(),
            "data:image/png;base64,BBBB".to_string(),
            CanvasData::capture(
                &Canvas::new(ImageBounds::new(4, 4)),
                ImageBounds::new(4, 4),
                1.0,
            ),
        );
        SavePayload {
            record,
            annotated_png: b"png-bytes".to_vec(),
        }
    }

    #[test]
    fn download_sink_writes_record_and_image_named_by_id() {
        let dir = scratch_dir("write");
        let sink = DownloadSink::with_dir(&dir);
        let payload = payload();
        let receipt = sink.deliver(&payload).expect("delivery should succeed");

        let id = payload.record.id.to_string();
        assert_eq!(
            receipt.locations,
            vec![dir.join(format!("{id}.json")), dir.join(format!("{id}.png"))]
        );
        assert_eq!(
            fs::read(dir.join(format!("{id}.png"))).expect("png should exist"),
            b"png-bytes"
        );
        let json = fs::read_to_string(dir.join(format!("{id}.json"))).expect("json should exist");
        let parsed: AnnotationRecord =
            serde_json::from_str(&json).expect("record should parse back");
        assert_eq!(parsed, payload.record);
        assert!(!dir.join(format!("{id}.json.part")).exists());
    }

    #[test]
    fn download_sink_reports_io_failure() {
        let dir = scratch_dir("blocked");
        fs::create_dir_all(dir.parent().expect("temp dir has a parent"))
            .expect("temp dir should exist");
        fs::write(&dir, b"not a directory").expect("blocking file should be writable");

        let sink = DownloadSink::with_dir(&dir);
        let err = sink.deliver(&payload()).expect_err("delivery should fail");
        assert!(matches!(err, StorageError::Io(_)));
        let _ = fs::remove_file(&dir);
    }

    #[test]
    fn paths_use_the_record_id() {
        let sink = DownloadSink::with_dir("/tmp/pagemark-out");
        assert_eq!(
            sink.record_path("abc"),
            PathBuf::from("/tmp/pagemark-out/abc.json")
        );
        assert_eq!(
            sink.image_path("abc"),
            PathBuf::from("/tmp/pagemark-out/abc.png")
        );
    }
}
