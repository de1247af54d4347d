//! Image asset ingestion
//!
//! This module turns a user-picked file into an [`Asset`]: an image whose
//! bytes travel inline as a base64 `data:` URI, so exported documents never
//! reference external files.
//!
//! # Architecture
//!
//! - `asset.rs` - the `Asset` value and its content-addressed id
//! - `source.rs` - file-like inputs (`FileSource`, `MemorySource`)
//! - `ingest.rs` - validation (type before size) and async encoding

mod asset;
mod ingest;
mod source;

pub use asset::{Asset, AssetId};
pub use ingest::{ingest, ingest_data_uri, IngestError, IngestLimits};
pub use source::{mime_type_for_path, AssetSource, FileSource, MemorySource};
