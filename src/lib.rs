//! dad-notes - rich-text notes with Markdown and HTML export
//!
//! The crate holds the document model behind a visual editor and the
//! pipeline that turns it into portable files:
//!
//! - `assets` - validates picked images and inlines them as data URIs
//! - `document` - the block tree (paragraphs, headings, lists, images)
//! - `markdown` - reads Markdown text into document blocks
//! - `surface` - bridges an opaque editing surface into document snapshots
//! - `export` - Markdown/HTML serializers and delivery sinks
//! - `session` - the owned session tying the pieces together
//!
//! # Example
//! ```ignore
//! use dad_notes::{config::Settings, export::ExportFormat, session::Session};
//! use dad_notes::surface::MemorySurface;
//!
//! let mut session = Session::new(Settings::default());
//! session.attach_surface(MemorySurface::ready());
//! let artifact = session.export(ExportFormat::Markdown, chrono::Utc::now());
//! assert_eq!(artifact.contents, "Start writing ✍️");
//! ```

pub mod assets;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod files;
pub mod markdown;
pub mod session;
pub mod surface;

pub use error::{Error, Result};
