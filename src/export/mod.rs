//! Document Export Module for dad-notes
//!
//! This module serializes documents to Markdown and HTML and hands the
//! result to a delivery sink.
//!
//! # Supported Export Formats
//!
//! - **Markdown**: CommonMark text, images embedded as data URIs
//! - **HTML**: Standalone page with inlined CSS, or a body fragment
//!
//! # Architecture
//!
//! - `options.rs` - Export formats and HTML options
//! - `markdown.rs` - Document to Markdown serializer
//! - `html.rs` - Document to HTML renderer
//! - `artifact.rs` - Serialized output with its file name and MIME type
//! - `delivery.rs` - Delivery sinks (directory, in-memory)
//! - `clipboard.rs` - Platform clipboard sink

pub mod artifact;
pub mod clipboard;
pub mod delivery;
pub mod html;
pub mod markdown;
pub mod options;

pub use artifact::{export_file_name, ExportArtifact};
pub use clipboard::ClipboardSink;
pub use delivery::{deliver, CapturingSink, Delivery, DeliverySink, DirectorySink};
pub use html::{to_html, to_html_fragment};
pub use markdown::to_markdown;
pub use options::{ExportFormat, HtmlOptions};
