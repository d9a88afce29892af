//! Image upload storage
//!
//! Uploads are decoded, re-encoded as JPEG and stored under
//! `<work_dir>/uploads/images`. Identical content is stored once:
//! `by_hash/<ab>/<sha256>` symlinks point at the stored file.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::utils::{AppError, AppResult, ErrorCode};

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for product images
const JPEG_QUALITY: u8 = 85;

/// Stored file description (upload response)
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    pub file_id: String,
    pub filename: String,
    pub size: usize,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct UploadService {
    images_dir: PathBuf,
    max_bytes: usize,
}

impl UploadService {
    pub fn new(images_dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            images_dir: images_dir.into(),
            max_bytes,
        }
    }

    /// Validate, re-encode and store an image (blocking, call from `spawn_blocking`)
    pub fn store(&self, original_name: Option<&str>, data: &[u8]) -> AppResult<StoredFile> {
        let original_name = original_name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::new(ErrorCode::NoFilename))?;
        if data.is_empty() {
            return Err(AppError::new(ErrorCode::EmptyFile));
        }
        if data.len() > self.max_bytes {
            return Err(AppError::with_message(
                ErrorCode::FileTooLarge,
                format!("File too large. Maximum size is {} bytes", self.max_bytes),
            )
            .with_detail("max_bytes", self.max_bytes));
        }

        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| {
                AppError::new(ErrorCode::InvalidFileExtension).with_detail("filename", original_name)
            })?;
        if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
            return Err(AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                format!("Unsupported file format '{}'. Supported: {}", ext, SUPPORTED_FORMATS.join(", ")),
            ));
        }

        let jpeg = reencode_jpeg(data)?;
        let hash = content_hash(&jpeg);

        fs::create_dir_all(&self.images_dir).map_err(storage_error)?;

        if let Some(existing) = self.find_by_hash(&hash) {
            tracing::info!(original_name = %original_name, existing_file = %existing, "Duplicate image, returning existing file");
            return Ok(stored(existing, jpeg.len()));
        }

        let filename = format!("{}.jpg", Uuid::new_v4());
        fs::write(self.images_dir.join(&filename), &jpeg).map_err(storage_error)?;
        self.link_hash(&hash, &filename)?;

        tracing::info!(original_name = %original_name, filename = %filename, size = jpeg.len(), hash = %hash, "Image stored");
        Ok(stored(filename, jpeg.len()))
    }

    /// Read a stored file
    pub async fn read(&self, filename: &str) -> AppResult<Vec<u8>> {
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
        {
            return Err(AppError::invalid_request("Invalid filename"));
        }
        tokio::fs::read(self.images_dir.join(filename))
            .await
            .map_err(|_| AppError::not_found(format!("File {}", filename)))
    }

    fn find_by_hash(&self, hash: &str) -> Option<String> {
        let link = self.images_dir.join("by_hash").join(&hash[..2]).join(hash);
        let target = fs::read_link(&link).ok()?;
        let name = target.file_name()?.to_string_lossy().to_string();
        // Dangling link: the file was removed
        self.images_dir.join(&name).exists().then_some(name)
    }

    fn link_hash(&self, hash: &str, filename: &str) -> AppResult<()> {
        let dir = self.images_dir.join("by_hash").join(&hash[..2]);
        fs::create_dir_all(&dir).map_err(storage_error)?;
        let link = dir.join(hash);
        if fs::symlink_metadata(&link).is_ok() {
            fs::remove_file(&link).map_err(storage_error)?;
        }
        symlink::symlink_auto(Path::new("../..").join(filename), &link).map_err(storage_error)
    }
}

fn stored(filename: String, size: usize) -> StoredFile {
    StoredFile {
        file_id: filename.trim_end_matches(".jpg").to_string(),
        url: format!("/api/uploads/{}", filename),
        filename,
        size,
    }
}

fn reencode_jpeg(data: &[u8]) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image file: {}", e))
    })?;

    let mut buffer = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut buffer), JPEG_QUALITY);
    img.to_rgb8().write_with_encoder(encoder).map_err(|e| {
        AppError::with_message(ErrorCode::ImageProcessingFailed, format!("Failed to compress image: {}", e))
    })?;
    Ok(buffer)
}

fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn storage_error(e: std::io::Error) -> AppError {
    AppError::with_message(ErrorCode::FileStorageFailed, format!("Failed to store file: {}", e))
}
