//! Filesystem-backed media storage.
//!
//! Payloads land under `{purpose}/{uploader}/{yyyy}/{mm}/{uuid}-{name}` so a
//! bucket listing groups by what the asset is for (banner, team-vn, post…)
//! before who uploaded it. The adapter is the only component touching the
//! storage root; everything else handles opaque stored paths.

use std::error::Error as StdError;
use std::fmt::Write as FmtWrite;
use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use futures::{StreamExt, pin_mut, stream};
use sha2::{Digest, Sha256};
use slug::slugify;
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

/// Errors that can occur while interacting with the media storage backend.
#[derive(Debug, Error)]
pub enum MediaStorageError {
    #[error("invalid stored path")]
    InvalidPath,
    #[error("invalid purpose prefix `{0}`")]
    InvalidPurpose(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("uploaded file stream failed")]
    PayloadStream {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("uploaded file is empty")]
    EmptyPayload,
    #[error("uploaded file size exceeds supported range")]
    SizeOverflow,
}

/// Result of storing a media payload.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub stored_path: String,
    pub file_name: String,
    pub checksum: String,
    pub size_bytes: i64,
}

#[derive(Debug)]
pub struct MediaStorage {
    root: PathBuf,
    public_base: String,
}

impl MediaStorage {
    /// Initialise storage rooted at the provided directory, creating it if
    /// necessary. `public_base` is the URL prefix stored paths are served
    /// under (e.g. `/media`).
    pub fn new(root: PathBuf, public_base: impl Into<String>) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            public_base: public_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Public URL for a stored path.
    pub fn public_url(&self, stored_path: &str) -> String {
        format!("{}/{stored_path}", self.public_base)
    }

    /// Store the provided payload stream and return metadata describing the
    /// stored asset. The payload is streamed to disk to avoid buffering
    /// large files in memory.
    pub async fn store_stream<S>(
        &self,
        purpose: &str,
        uploader: &str,
        original_name: &str,
        stream: S,
    ) -> Result<StoredMedia, MediaStorageError>
    where
        S: futures::Stream<Item = Result<Bytes, MediaStorageError>>,
    {
        let (stored_path, file_name) = self.build_stored_path(purpose, uploader, original_name)?;
        let absolute = self.resolve(&stored_path)?;

        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&absolute).await?;
        let mut hasher = Sha256::new();
        let mut total_bytes: u64 = 0;
        let mut saw_payload = false;

        pin_mut!(stream);
        while let Some(chunk_result) = stream.next().await {
            let chunk = match chunk_result {
                Ok(chunk) => chunk,
                Err(err) => {
                    drop(file);
                    let _ = fs::remove_file(&absolute).await;
                    return Err(err);
                }
            };

            if chunk.is_empty() {
                continue;
            }

            saw_payload = true;
            total_bytes = total_bytes
                .checked_add(chunk.len() as u64)
                .ok_or(MediaStorageError::SizeOverflow)?;
            file.write_all(&chunk).await?;
            hasher.update(&chunk);
        }

        file.flush().await?;

        if !saw_payload {
            drop(file);
            let _ = fs::remove_file(&absolute).await;
            return Err(MediaStorageError::EmptyPayload);
        }

        let digest = hasher.finalize();
        let checksum = hex_from_bytes(&digest);
        let size_bytes =
            i64::try_from(total_bytes).map_err(|_| MediaStorageError::SizeOverflow)?;

        metrics::counter!("clinica_media_uploads_total").increment(1);

        Ok(StoredMedia {
            stored_path,
            file_name,
            checksum,
            size_bytes,
        })
    }

    /// Store a fully-buffered payload.
    pub async fn store(
        &self,
        purpose: &str,
        uploader: &str,
        original_name: &str,
        data: Bytes,
    ) -> Result<StoredMedia, MediaStorageError> {
        let stream = stream::once(async move { Ok::<_, MediaStorageError>(data) });
        self.store_stream(purpose, uploader, original_name, stream)
            .await
    }

    /// Remove the stored payload. Missing files are treated as success.
    pub async fn delete(&self, stored_path: &str) -> Result<(), MediaStorageError> {
        let absolute = self.resolve(stored_path)?;
        match fs::remove_file(&absolute).await {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(MediaStorageError::Io(err)),
        }
    }

    /// Obtain the absolute filesystem path for a stored asset.
    pub fn absolute_path(&self, stored_path: &str) -> Result<PathBuf, MediaStorageError> {
        self.resolve(stored_path)
    }

    fn resolve(&self, stored_path: &str) -> Result<PathBuf, MediaStorageError> {
        let relative = Path::new(stored_path);
        if relative.is_absolute()
            || relative
                .components()
                .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(MediaStorageError::InvalidPath);
        }

        Ok(self.root.join(relative))
    }

    fn build_stored_path(
        &self,
        purpose: &str,
        uploader: &str,
        original_name: &str,
    ) -> Result<(String, String), MediaStorageError> {
        let purpose_slug = slugify(purpose);
        if purpose_slug.is_empty() {
            return Err(MediaStorageError::InvalidPurpose(purpose.to_string()));
        }

        let mut uploader_slug = slugify(uploader);
        if uploader_slug.is_empty() {
            uploader_slug = "anonymous".to_string();
        }

        let (year, month, _day) = time::OffsetDateTime::now_utc().to_calendar_date();
        let identifier = Uuid::new_v4();
        let file_name = format!("{identifier}-{}", sanitize_filename(original_name));
        let stored_path = format!(
            "{purpose_slug}/{uploader_slug}/{year}/{:02}/{file_name}",
            month as u8
        );
        Ok((stored_path, file_name))
    }
}

fn sanitize_filename(original: &str) -> String {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("upload");
    let mut base = slugify(stem);
    if base.is_empty() {
        base = "upload".to_string();
    }

    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.trim_matches('.').to_ascii_lowercase())
        .filter(|value| !value.is_empty());

    match extension {
        Some(ext) => format!("{base}.{ext}"),
        None => base,
    }
}

fn hex_from_bytes(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = FmtWrite::write_fmt(&mut output, format_args!("{byte:02x}"));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, MediaStorage) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = MediaStorage::new(dir.path().to_path_buf(), "/media").expect("storage");
        (dir, storage)
    }

    #[tokio::test]
    async fn store_writes_payload_under_purpose_prefix() {
        let (_dir, storage) = storage();
        let stored = storage
            .store("team-vn", "bs.lan@clinic.vn", "Ảnh chân dung.JPG", Bytes::from_static(b"img"))
            .await
            .expect("stored");

        assert!(stored.stored_path.starts_with("team-vn/bs-lan-clinic-vn/"));
        assert!(stored.stored_path.ends_with("-anh-chan-dung.jpg"));
        assert_eq!(stored.size_bytes, 3);
        assert_eq!(stored.checksum.len(), 64);

        let absolute = storage.absolute_path(&stored.stored_path).expect("path");
        assert!(absolute.exists());
    }

    #[tokio::test]
    async fn empty_payload_is_rejected_and_cleaned_up() {
        let (_dir, storage) = storage();
        let err = storage
            .store("banner", "admin", "empty.png", Bytes::new())
            .await
            .expect_err("rejected");
        assert!(matches!(err, MediaStorageError::EmptyPayload));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_dir, storage) = storage();
        let stored = storage
            .store("post", "admin", "a.png", Bytes::from_static(b"x"))
            .await
            .expect("stored");
        storage.delete(&stored.stored_path).await.expect("deleted");
        storage.delete(&stored.stored_path).await.expect("idempotent");
    }

    #[test]
    fn traversal_paths_are_rejected() {
        let (_dir, storage) = storage();
        assert!(matches!(
            storage.absolute_path("../outside"),
            Err(MediaStorageError::InvalidPath)
        ));
        assert!(matches!(
            storage.absolute_path("/absolute"),
            Err(MediaStorageError::InvalidPath)
        ));
    }

    #[test]
    fn blank_purpose_is_rejected() {
        let (_dir, storage) = storage();
        let err = storage
            .build_stored_path("???", "admin", "a.png")
            .expect_err("rejected");
        assert!(matches!(err, MediaStorageError::InvalidPurpose(_)));
    }

    #[test]
    fn public_url_joins_base_and_path() {
        let (_dir, storage) = storage();
        assert_eq!(
            storage.public_url("banner/admin/2026/08/x.png"),
            "/media/banner/admin/2026/08/x.png"
        );
    }
}
