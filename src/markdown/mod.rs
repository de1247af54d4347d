//! Markdown reading
//!
//! This module turns Markdown text into document blocks using the comrak
//! library, a CommonMark + GFM compatible parser. It feeds the configured
//! default content, text-based editing surfaces and the CLI's `--input`.
//!
//! Writing Markdown is the export pipeline's job (`crate::export::markdown`).
//!
//! # Example
//! ```ignore
//! use dad_notes::markdown::parse_blocks;
//!
//! let blocks = parse_blocks("# Hello\n\nThis is **bold** text.", &limits);
//! ```

mod parser;

pub use parser::parse_blocks;
