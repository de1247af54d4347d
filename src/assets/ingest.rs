//! Validation and encoding of picked images.

use super::asset::Asset;
use super::source::AssetSource;
use crate::config::Settings;
use base64::{engine::general_purpose::STANDARD, Engine};
use log::{debug, info};
use std::fmt;
use std::io;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while turning a picked file into an asset.
#[derive(Debug)]
pub enum IngestError {
    /// The file's MIME type is outside the allowed image types
    NotAnImage { mime_type: String },
    /// The file exceeds the configured size limit
    TooLarge { size: u64, max: u64 },
    /// Reading the bytes failed part way
    ReadFailed(io::Error),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::NotAnImage { mime_type } => {
                write!(f, "Not an image (type: {})", mime_type)
            }
            IngestError::TooLarge { size, max } => write!(
                f,
                "Image is too large ({} bytes, maximum is {} bytes)",
                size, max
            ),
            IngestError::ReadFailed(e) => write!(f, "Failed to read image: {}", e),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::ReadFailed(e) => Some(e),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Limits
// ─────────────────────────────────────────────────────────────────────────────

/// The checks every asset passes before it can enter a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestLimits {
    /// Largest accepted payload, inclusive
    pub max_bytes: u64,
    /// Required MIME type prefix, compared case-insensitively
    pub mime_prefix: String,
}

impl IngestLimits {
    /// 5 MiB
    pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;
    pub const DEFAULT_MIME_PREFIX: &'static str = "image/";

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_bytes: settings.max_asset_bytes,
            mime_prefix: settings.allowed_asset_mime_prefix.clone(),
        }
    }

    fn check_type(&self, mime_type: &str) -> Result<(), IngestError> {
        let prefix = self.mime_prefix.to_ascii_lowercase();
        if mime_type.to_ascii_lowercase().starts_with(&prefix) {
            Ok(())
        } else {
            Err(IngestError::NotAnImage {
                mime_type: mime_type.to_string(),
            })
        }
    }

    fn check_size(&self, size: u64) -> Result<(), IngestError> {
        if size <= self.max_bytes {
            Ok(())
        } else {
            Err(IngestError::TooLarge {
                size,
                max: self.max_bytes,
            })
        }
    }
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_bytes: Self::DEFAULT_MAX_BYTES,
            mime_prefix: Self::DEFAULT_MIME_PREFIX.to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ingestion
// ─────────────────────────────────────────────────────────────────────────────

/// Validate a picked file and encode it as an inline asset.
///
/// The type is checked before the size, so a large non-image always reports
/// `NotAnImage`. The bytes are read asynchronously and checked again after
/// the read, since the declared length can be stale. Nothing here touches a
/// document; inserting the asset is a separate step.
pub async fn ingest<S: AssetSource>(source: &S, limits: &IngestLimits) -> Result<Asset, IngestError> {
    let mime_type = source.mime_type().trim();
    limits.check_type(mime_type)?;
    limits.check_size(source.byte_len())?;

    debug!(
        "Reading {} ({} bytes declared)",
        source.name(),
        source.byte_len()
    );
    let bytes = source.read_bytes().await.map_err(IngestError::ReadFailed)?;
    limits.check_size(bytes.len() as u64)?;

    let asset = Asset::from_bytes(mime_type, &bytes);
    info!(
        "Ingested {} as asset {} ({}, {} bytes)",
        source.name(),
        asset.id(),
        asset.mime_type(),
        asset.byte_len()
    );
    Ok(asset)
}

/// Rebuild an asset from a base64 `data:` URI, e.g. one found in imported
/// Markdown. The same limits apply as for picked files.
pub fn ingest_data_uri(uri: &str, limits: &IngestLimits) -> Result<Asset, IngestError> {
    let invalid = |msg: &str| IngestError::ReadFailed(io::Error::new(io::ErrorKind::InvalidData, msg));

    let rest = uri
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &uri[5..])
        .ok_or_else(|| invalid("not a data URI"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| invalid("data URI has no payload"))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| invalid("only base64 data URIs are supported"))?;

    limits.check_type(mime_type)?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| invalid(&format!("invalid base64 payload: {}", e)))?;
    limits.check_size(bytes.len() as u64)?;

    Ok(Asset::from_bytes(mime_type, &bytes))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{FileSource, MemorySource};
    use tempfile::TempDir;

    const MIB: usize = 1024 * 1024;

    /// A source whose read always fails, e.g. a file removed mid-read.
    struct BrokenSource;

    impl AssetSource for BrokenSource {
        fn name(&self) -> &str {
            "broken.png"
        }
        fn mime_type(&self) -> &str {
            "image/png"
        }
        fn byte_len(&self) -> u64 {
            10
        }
        async fn read_bytes(&self) -> io::Result<Vec<u8>> {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "disk went away"))
        }
    }

    /// A source that under-reports its length.
    struct GrowingSource(Vec<u8>);

    impl AssetSource for GrowingSource {
        fn name(&self) -> &str {
            "growing.png"
        }
        fn mime_type(&self) -> &str {
            "image/png"
        }
        fn byte_len(&self) -> u64 {
            1
        }
        async fn read_bytes(&self) -> io::Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_ingest_png() {
        let source = MemorySource::new("dot.png", "image/png", vec![0x89, b'P', b'N', b'G']);
        let asset = ingest(&source, &IngestLimits::default()).await.unwrap();

        assert_eq!(asset.mime_type(), "image/png");
        assert_eq!(asset.byte_len(), 4);
        assert!(asset.inline_reference().starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_non_image_is_rejected() {
        let source = MemorySource::new("notes.txt", "text/plain", b"hello".to_vec());
        let err = ingest(&source, &IngestLimits::default()).await.unwrap_err();
        assert!(matches!(err, IngestError::NotAnImage { ref mime_type } if mime_type == "text/plain"));
    }

    #[tokio::test]
    async fn test_type_is_checked_before_size() {
        let source = MemorySource::new("huge.pdf", "application/pdf", vec![0; 6 * MIB]);
        let err = ingest(&source, &IngestLimits::default()).await.unwrap_err();
        assert!(matches!(err, IngestError::NotAnImage { .. }));
    }

    #[tokio::test]
    async fn test_exact_limit_is_accepted() {
        let limits = IngestLimits {
            max_bytes: 1024,
            ..IngestLimits::default()
        };
        let source = MemorySource::new("edge.png", "image/png", vec![0; 1024]);
        assert!(ingest(&source, &limits).await.is_ok());
    }

    #[tokio::test]
    async fn test_one_byte_over_is_rejected() {
        let limits = IngestLimits {
            max_bytes: 1024,
            ..IngestLimits::default()
        };
        let source = MemorySource::new("edge.png", "image/png", vec![0; 1025]);
        let err = ingest(&source, &limits).await.unwrap_err();
        assert!(matches!(err, IngestError::TooLarge { size: 1025, max: 1024 }));
    }

    #[tokio::test]
    async fn test_six_mib_jpeg_is_too_large() {
        let source = MemorySource::new("photo.jpg", "image/jpeg", vec![0xFF; 6 * MIB]);
        let err = ingest(&source, &IngestLimits::default()).await.unwrap_err();
        assert!(matches!(err, IngestError::TooLarge { .. }));
    }

    #[tokio::test]
    async fn test_read_failure() {
        let err = ingest(&BrokenSource, &IngestLimits::default())
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::ReadFailed(_)));
        assert!(err.to_string().contains("disk went away"));
    }

    #[tokio::test]
    async fn test_size_is_rechecked_after_read() {
        let limits = IngestLimits {
            max_bytes: 8,
            ..IngestLimits::default()
        };
        let err = ingest(&GrowingSource(vec![0; 9]), &limits).await.unwrap_err();
        assert!(matches!(err, IngestError::TooLarge { size: 9, .. }));
    }

    #[tokio::test]
    async fn test_mime_prefix_is_case_insensitive() {
        let source = MemorySource::new("x.png", "IMAGE/PNG", vec![1]);
        let asset = ingest(&source, &IngestLimits::default()).await.unwrap();
        assert_eq!(asset.mime_type(), "image/png");
    }

    #[tokio::test]
    async fn test_ingest_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pic.png");
        std::fs::write(&path, vec![3u8; 10 * 1024]).unwrap();

        let source = FileSource::open(&path).await.unwrap();
        let asset = ingest(&source, &IngestLimits::default()).await.unwrap();
        assert_eq!(asset.byte_len(), 10 * 1024);
    }

    #[test]
    fn test_ingest_data_uri_roundtrips_asset() {
        let original = Asset::from_bytes("image/png", b"pixels");
        let parsed = ingest_data_uri(original.inline_reference(), &IngestLimits::default()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_ingest_data_uri_rejects_non_images() {
        let err = ingest_data_uri("data:text/plain;base64,aGk=", &IngestLimits::default())
            .unwrap_err();
        assert!(matches!(err, IngestError::NotAnImage { .. }));
    }

    #[test]
    fn test_ingest_data_uri_rejects_malformed_input() {
        let limits = IngestLimits::default();
        assert!(matches!(
            ingest_data_uri("https://example.com/a.png", &limits),
            Err(IngestError::ReadFailed(_))
        ));
        assert!(matches!(
            ingest_data_uri("data:image/png,raw", &limits),
            Err(IngestError::ReadFailed(_))
        ));
        assert!(matches!(
            ingest_data_uri("data:image/png;base64,!!!", &limits),
            Err(IngestError::ReadFailed(_))
        ));
    }
}
