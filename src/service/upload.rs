//! Upload Relay
//!
//! Accepts in-memory file buffers and forwards them to blob storage or local
//! disk, returning stable URLs. Admission (count, mime type, size) is checked
//! for the whole batch before any file is persisted.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use reqwest::Client as HttpClient;
use thiserror::Error;

use crate::utils::error::AppError;
use crate::utils::security::generate_secure_token;

/// Accepted raster image formats
pub const ALLOWED_IMAGE_MIMES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Default per-file size bound (5 MiB)
pub const DEFAULT_MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Default per-request file count bound
pub const DEFAULT_MAX_FILES: usize = 5;

/// An in-memory file received from a multipart request
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Upload relay specific errors
#[derive(Error, Debug)]
pub enum UploadError {
    /// More files than the per-request bound
    #[error("At most {max} images are allowed per request")]
    TooManyFiles { max: usize },

    /// Mime type outside the image allow-list
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// File exceeding the per-file size bound
    #[error("File '{name}' exceeds the {max} byte limit")]
    PayloadTooLarge { name: String, max: usize },

    /// Transport failure against the remote blob store
    #[error("Upload transport error: {0}")]
    Transport(String),

    /// Local-disk write failure
    #[error("Upload I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend construction failed
    #[error("Upload configuration error: {0}")]
    Configuration(String),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::TooManyFiles { .. } => AppError::Validation(err.to_string()),
            UploadError::UnsupportedMediaType(mime) => AppError::UnsupportedMediaType(format!(
                "Only image uploads are allowed (got '{}')",
                mime
            )),
            UploadError::PayloadTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            UploadError::Transport(msg) => AppError::UploadFailed(msg),
            UploadError::Io(e) => AppError::UploadFailed(e.to_string()),
            UploadError::Configuration(msg) => AppError::Configuration(msg),
        }
    }
}

/// Result type for upload operations
pub type UploadResult<T> = Result<T, UploadError>;

/// Per-request admission bounds
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_file_bytes: usize,
    pub max_files: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

/// Where admitted files end up
enum Backend {
    /// Files under a served directory, URLs under the public prefix
    LocalDisk {
        dir: PathBuf,
        public_base_url: String,
    },
    /// Files forwarded to a remote blob store over HTTP
    Remote {
        endpoint: String,
        access_key: Option<String>,
        http_client: HttpClient,
    },
}

/// Upload relay over one of the two backends
pub struct UploadService {
    backend: Backend,
    limits: UploadLimits,
}

impl UploadService {
    /// Relay into a local directory served under `public_base_url`
    pub fn local_disk(
        dir: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
        limits: UploadLimits,
    ) -> Self {
        Self {
            backend: Backend::LocalDisk {
                dir: dir.into(),
                public_base_url: public_base_url.into(),
            },
            limits,
        }
    }

    /// Relay to a remote blob store with a bounded transport timeout
    ///
    /// A timed-out transfer is fatal to the request; it is not retried.
    pub fn remote(
        endpoint: impl Into<String>,
        access_key: Option<String>,
        timeout: Duration,
        limits: UploadLimits,
    ) -> UploadResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UploadError::Configuration(e.to_string()))?;

        Ok(Self {
            backend: Backend::Remote {
                endpoint: endpoint.into().trim_end_matches('/').to_string(),
                access_key,
                http_client,
            },
            limits,
        })
    }

    pub fn limits(&self) -> UploadLimits {
        self.limits
    }

    /// Check one file against the allow-list and size bound
    pub fn admit(&self, file: &UploadedImage) -> UploadResult<()> {
        let mime = file.content_type.to_ascii_lowercase();
        if !ALLOWED_IMAGE_MIMES.contains(&mime.as_str()) {
            return Err(UploadError::UnsupportedMediaType(file.content_type.clone()));
        }
        if file.bytes.len() > self.limits.max_file_bytes {
            return Err(UploadError::PayloadTooLarge {
                name: file.file_name.clone(),
                max: self.limits.max_file_bytes,
            });
        }
        Ok(())
    }

    /// Check a whole batch before anything is persisted
    pub fn admit_all(&self, files: &[UploadedImage]) -> UploadResult<()> {
        if files.len() > self.limits.max_files {
            return Err(UploadError::TooManyFiles {
                max: self.limits.max_files,
            });
        }
        for file in files {
            self.admit(file)?;
        }
        Ok(())
    }

    /// Store one admitted file and return its public URL
    pub async fn store(&self, file: &UploadedImage) -> UploadResult<String> {
        self.admit(file)?;
        self.store_admitted(file).await
    }

    /// Store a batch with all-or-nothing admission
    ///
    /// Every file is checked before the first write, so an inadmissible 6th
    /// file rejects the request without persisting the first five.
    pub async fn store_all(&self, files: &[UploadedImage]) -> UploadResult<Vec<String>> {
        self.admit_all(files)?;

        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            urls.push(self.store_admitted(file).await?);
        }
        Ok(urls)
    }

    async fn store_admitted(&self, file: &UploadedImage) -> UploadResult<String> {
        let name = storage_name(&file.file_name);

        match &self.backend {
            Backend::LocalDisk {
                dir,
                public_base_url,
            } => {
                tokio::fs::create_dir_all(dir).await?;
                tokio::fs::write(dir.join(&name), &file.bytes).await?;
                Ok(format!("{}/{}", public_base_url.trim_end_matches('/'), name))
            }
            Backend::Remote {
                endpoint,
                access_key,
                http_client,
            } => {
                let url = format!("{}/{}", endpoint, name);
                let mut request = http_client
                    .put(&url)
                    .header(reqwest::header::CONTENT_TYPE, &file.content_type)
                    .body(file.bytes.clone());
                if let Some(key) = access_key {
                    request = request.bearer_auth(key);
                }

                let response = request
                    .send()
                    .await
                    .map_err(|e| UploadError::Transport(e.to_string()))?;
                response
                    .error_for_status()
                    .map_err(|e| UploadError::Transport(e.to_string()))?;

                Ok(url)
            }
        }
    }
}

/// Collision-resistant stored name: sanitized stem, millisecond timestamp,
/// random suffix, original extension.
fn storage_name(original_name: &str) -> String {
    let path = Path::new(original_name);

    let stem: String = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(40)
        .collect();
    let stem = if stem.is_empty() {
        "image".to_string()
    } else {
        stem
    };

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()));

    let unique = format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        generate_secure_token(8)
    );

    match ext {
        Some(ext) => format!("{}-{}.{}", stem, unique, ext),
        None => format!("{}-{}", stem, unique),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn image(name: &str, mime: &str, size: usize) -> UploadedImage {
        UploadedImage {
            file_name: name.to_string(),
            content_type: mime.to_string(),
            bytes: Bytes::from(vec![0u8; size]),
        }
    }

    fn stored_file_count(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_store_writes_file_and_returns_url() {
        let tmp = TempDir::new().unwrap();
        let service =
            UploadService::local_disk(tmp.path(), "/uploads", UploadLimits::default());

        let url = service
            .store(&image("sunset.JPG", "image/jpeg", 1024))
            .await
            .unwrap();

        assert!(url.starts_with("/uploads/sunset-"));
        assert!(url.ends_with(".jpg"));
        assert_eq!(stored_file_count(tmp.path()), 1);
    }

    #[tokio::test]
    async fn test_sixth_file_rejects_whole_batch_before_persisting() {
        let tmp = TempDir::new().unwrap();
        let service =
            UploadService::local_disk(tmp.path(), "/uploads", UploadLimits::default());

        let files: Vec<_> = (0..6)
            .map(|i| image(&format!("f{}.png", i), "image/png", 128))
            .collect();

        let result = service.store_all(&files).await;
        assert!(matches!(result, Err(UploadError::TooManyFiles { max: 5 })));
        assert_eq!(stored_file_count(tmp.path()), 0);
    }

    #[tokio::test]
    async fn test_disallowed_mime_rejects_batch_before_persisting() {
        let tmp = TempDir::new().unwrap();
        let service =
            UploadService::local_disk(tmp.path(), "/uploads", UploadLimits::default());

        let files = vec![
            image("ok.png", "image/png", 128),
            image("nope.pdf", "application/pdf", 128),
        ];

        let result = service.store_all(&files).await;
        assert!(matches!(result, Err(UploadError::UnsupportedMediaType(_))));
        assert_eq!(stored_file_count(tmp.path()), 0);
    }

    #[tokio::test]
    async fn test_oversize_file_rejected() {
        let tmp = TempDir::new().unwrap();
        let limits = UploadLimits {
            max_file_bytes: 1024,
            max_files: 5,
        };
        let service = UploadService::local_disk(tmp.path(), "/uploads", limits);

        let result = service.store(&image("big.png", "image/png", 2048)).await;
        assert!(matches!(result, Err(UploadError::PayloadTooLarge { .. })));
        assert_eq!(stored_file_count(tmp.path()), 0);
    }

    #[tokio::test]
    async fn test_batch_within_limits_stores_every_file() {
        let tmp = TempDir::new().unwrap();
        let service =
            UploadService::local_disk(tmp.path(), "/uploads/", UploadLimits::default());

        let files = vec![
            image("a.png", "image/png", 64),
            image("b.webp", "image/webp", 64),
        ];

        let urls = service.store_all(&files).await.unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls.iter().all(|u| u.starts_with("/uploads/")));
        assert_eq!(stored_file_count(tmp.path()), 2);
    }

    #[test]
    fn test_storage_name_is_unique_and_keeps_extension() {
        let a = storage_name("photo.png");
        let b = storage_name("photo.png");

        assert_ne!(a, b);
        assert!(a.starts_with("photo-"));
        assert!(a.ends_with(".png"));
    }

    #[test]
    fn test_storage_name_sanitizes_hostile_input() {
        let name = storage_name("../../etc/passwd");
        assert!(!name.contains(".."));
        assert!(!name.contains('/'));
    }

    #[test]
    fn test_mime_allow_list_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        let service =
            UploadService::local_disk(tmp.path(), "/uploads", UploadLimits::default());

        assert!(service.admit(&image("a.png", "IMAGE/PNG", 10)).is_ok());
        assert!(service.admit(&image("a.svg", "image/svg+xml", 10)).is_err());
    }
}
