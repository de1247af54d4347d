//! Block nodes of the document tree.

use super::text::{normalize_runs, plain_text, TextRun};
use crate::assets::Asset;

/// Heading level (H1-H6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeadingLevel {
    H1 = 1,
    H2 = 2,
    H3 = 3,
    H4 = 4,
    H5 = 5,
    H6 = 6,
}

impl HeadingLevel {
    pub fn level(self) -> u8 {
        self as u8
    }
}

impl From<u8> for HeadingLevel {
    /// Out-of-range levels clamp to the nearest valid one.
    fn from(level: u8) -> Self {
        match level {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            3 => HeadingLevel::H3,
            4 => HeadingLevel::H4,
            5 => HeadingLevel::H5,
            _ => HeadingLevel::H6,
        }
    }
}

/// List type (ordered or unordered)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// One entry of a list. Items hold their own block sequence so lists can
/// nest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

impl ListItem {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// An item holding a single plain paragraph.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![Block::paragraph(text)])
    }
}

/// An image placed as its own block. The block owns its asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlock {
    pub asset: Asset,
    pub alt: String,
}

/// A top-level structural unit of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<TextRun>),
    Heading {
        level: HeadingLevel,
        runs: Vec<TextRun>,
    },
    List {
        kind: ListKind,
        items: Vec<ListItem>,
    },
    Image(ImageBlock),
    Quote(Vec<Block>),
    CodeBlock {
        language: String,
        code: String,
    },
    Rule,
}

impl Block {
    /// A paragraph with a single plain run.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph(vec![TextRun::plain(text)])
    }

    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            runs: vec![TextRun::plain(text)],
        }
    }

    pub fn list(kind: ListKind, items: Vec<ListItem>) -> Self {
        Block::List { kind, items }
    }

    pub fn image(asset: Asset, alt: impl Into<String>) -> Self {
        Block::Image(ImageBlock {
            asset,
            alt: alt.into(),
        })
    }

    /// Short name of the block kind, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading { .. } => "heading",
            Block::List {
                kind: ListKind::Ordered,
                ..
            } => "ordered list",
            Block::List { .. } => "unordered list",
            Block::Image(_) => "image",
            Block::Quote(_) => "quote",
            Block::CodeBlock { .. } => "code block",
            Block::Rule => "rule",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Block::Image(_))
    }

    /// Text content of this block and its descendants, marks ignored.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph(runs) | Block::Heading { runs, .. } => plain_text(runs),
            Block::List { items, .. } => items
                .iter()
                .map(|item| blocks_plain_text(&item.blocks))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Image(image) => image.alt.clone(),
            Block::Quote(blocks) => blocks_plain_text(blocks),
            Block::CodeBlock { code, .. } => code.clone(),
            Block::Rule => String::new(),
        }
    }

    /// Image blocks at any depth below (and including) this block.
    pub(crate) fn collect_images<'a>(&'a self, out: &mut Vec<&'a ImageBlock>) {
        match self {
            Block::Image(image) => out.push(image),
            Block::List { items, .. } => {
                for item in items {
                    for block in &item.blocks {
                        block.collect_images(out);
                    }
                }
            }
            Block::Quote(blocks) => {
                for block in blocks {
                    block.collect_images(out);
                }
            }
            _ => {}
        }
    }
}

fn blocks_plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::plain_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Bring a block sequence into canonical form.
///
/// Runs are merged, lists without items are removed, and containers that
/// end up empty get a single empty paragraph so they stay editable.
pub(crate) fn normalize_blocks(blocks: &mut Vec<Block>) {
    for block in blocks.iter_mut() {
        match block {
            Block::Paragraph(runs) | Block::Heading { runs, .. } => normalize_runs(runs),
            Block::List { items, .. } => {
                for item in items.iter_mut() {
                    normalize_container(&mut item.blocks);
                }
            }
            Block::Quote(children) => normalize_container(children),
            Block::Image(_) | Block::CodeBlock { .. } | Block::Rule => {}
        }
    }
    blocks.retain(|block| !matches!(block, Block::List { items, .. } if items.is_empty()));
}

/// Normalize a nested sequence that must never be empty.
pub(crate) fn normalize_container(blocks: &mut Vec<Block>) {
    normalize_blocks(blocks);
    if blocks.is_empty() {
        blocks.push(Block::Paragraph(Vec::new()));
    }
}
