//! File-like inputs for the ingestor.

use image::ImageFormat;
use log::debug;
use std::io;
use std::path::{Path, PathBuf};

/// Anything the user can pick as an image: it reports a MIME type and a
/// length up front, and yields its bytes asynchronously.
#[allow(async_fn_in_trait)]
pub trait AssetSource {
    /// Display name used in logs and notifications.
    fn name(&self) -> &str;

    /// Declared MIME type.
    fn mime_type(&self) -> &str;

    /// Declared length in bytes.
    fn byte_len(&self) -> u64;

    /// Read the whole payload without blocking the caller's thread.
    async fn read_bytes(&self) -> io::Result<Vec<u8>>;
}

// ─────────────────────────────────────────────────────────────────────────────
// FileSource
// ─────────────────────────────────────────────────────────────────────────────

/// A file on disk. The MIME type comes from the extension.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
    mime_type: String,
    byte_len: u64,
}

impl FileSource {
    /// Stat the file and derive its MIME type.
    pub async fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a file", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_type_for_path(&path);
        debug!("Opened {} as {} ({} bytes)", name, mime_type, metadata.len());

        Ok(Self {
            path,
            name,
            mime_type,
            byte_len: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AssetSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn byte_len(&self) -> u64 {
        self.byte_len
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// Guess a MIME type from a file extension.
///
/// Raster formats come from the `image` crate's format table; a few
/// common non-image types are named so they are reported accurately.
pub fn mime_type_for_path(path: &Path) -> String {
    if let Ok(format) = ImageFormat::from_path(path) {
        return format.to_mime_type().to_string();
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "svg" => "image/svg+xml",
        "md" | "markdown" => "text/markdown",
        "txt" | "text" => "text/plain",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
    .to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// MemorySource
// ─────────────────────────────────────────────────────────────────────────────

/// Bytes already held in memory, e.g. pasted from the clipboard.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

impl AssetSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}
