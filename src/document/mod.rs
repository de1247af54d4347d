//! Structured document model
//!
//! A [`Document`] is an ordered, never-empty sequence of [`Block`]s. Blocks
//! carry text runs with formatting marks, nested lists, or inline image
//! assets. The model holds no markup knowledge; serialization lives in
//! `crate::export`.
//!
//! # Example
//! ```ignore
//! use dad_notes::document::{Block, Document};
//!
//! let mut doc = Document::default();
//! let index = doc.insert_image(1, asset, "a sunset");
//! let snapshot = doc.snapshot();
//! assert_eq!(snapshot.image_count(), 1);
//! ```

mod block;
mod text;

pub use block::{Block, HeadingLevel, ImageBlock, ListItem, ListKind};
pub use text::{normalize_runs, plain_text, Marks, TextRun};

use crate::assets::Asset;
use block::normalize_container;
use log::debug;

/// The root of an editable document.
///
/// Invariants: the block sequence is never empty and is always in canonical
/// form (see `normalize`). Every mutation keeps both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Text of the paragraph a fresh session starts with.
    pub const PLACEHOLDER: &'static str = "Start writing ✍️";

    /// Build a document from blocks. An empty sequence becomes a single
    /// empty paragraph.
    pub fn new(blocks: Vec<Block>) -> Self {
        let mut doc = Self { blocks };
        doc.normalize();
        doc
    }

    /// A document holding one paragraph with the given text.
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::new(vec![Block::paragraph(text)])
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of top-level blocks. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Images at any depth, in document order.
    pub fn images(&self) -> Vec<&ImageBlock> {
        let mut images = Vec::new();
        for block in &self.blocks {
            block.collect_images(&mut images);
        }
        images
    }

    pub fn image_count(&self) -> usize {
        self.images().len()
    }

    /// Plain text of the first heading, if any.
    pub fn title(&self) -> Option<String> {
        self.blocks.iter().find_map(|block| match block {
            Block::Heading { runs, .. } => {
                let text = plain_text(runs).replace('\n', " ");
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            _ => None,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert an image block at `index` (clamped to the end) and return the
    /// index it landed at.
    pub fn insert_image(&mut self, index: usize, asset: Asset, alt: impl Into<String>) -> usize {
        let index = index.min(self.blocks.len());
        debug!("Inserting image {} at block {}", asset.id(), index);
        self.blocks.insert(index, Block::image(asset, alt));
        index
    }

    /// Replace the whole block sequence in one step.
    pub fn replace_content(&mut self, blocks: Vec<Block>) {
        let mut next = Self { blocks };
        next.normalize();
        *self = next;
    }

    /// An independent copy of the current state.
    pub fn snapshot(&self) -> Document {
        debug_assert!(self.is_canonical(), "document left canonical form");
        self.clone()
    }

    /// Merge runs, drop empty lists, and make sure no container is empty.
    pub fn normalize(&mut self) {
        normalize_container(&mut self.blocks);
    }

    pub(crate) fn is_canonical(&self) -> bool {
        let mut copy = self.clone();
        copy.normalize();
        copy == *self
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::placeholder(Self::PLACEHOLDER)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
