//! The inline image asset value.

use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

/// Content-addressed identifier of an asset.
///
/// Two assets built from the same bytes share an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(String);

impl AssetId {
    /// Number of hex digits of the SHA-256 digest kept in the id.
    const HEX_LEN: usize = 16;

    /// Derive the id for a byte payload.
    pub fn for_bytes(bytes: &[u8]) -> Self {
        let mut digest = hex::encode(Sha256::digest(bytes));
        digest.truncate(Self::HEX_LEN);
        Self(digest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An embedded image.
///
/// The payload lives only inside the inline reference, which is immutable
/// and shared between document snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    id: AssetId,
    mime_type: String,
    byte_len: u64,
    data_uri: Arc<str>,
}

impl Asset {
    /// Encode validated bytes. Callers go through `ingest` so the type and
    /// size limits have already been checked.
    pub(crate) fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        let data_uri = format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes));
        Self {
            id: AssetId::for_bytes(bytes),
            mime_type,
            byte_len: bytes.len() as u64,
            data_uri: data_uri.into(),
        }
    }

    pub fn id(&self) -> &AssetId {
        &self.id
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Size of the decoded image in bytes.
    pub fn byte_len(&self) -> u64 {
        self.byte_len
    }

    /// The self-contained `data:` URI usable directly as `src` or link target.
    pub fn inline_reference(&self) -> &str {
        &self.data_uri
    }
}
