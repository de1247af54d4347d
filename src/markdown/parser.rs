//! Markdown reader implementation using comrak
//!
//! This module parses Markdown text with comrak and converts the AST into
//! document blocks. Images whose source is a base64 `data:` URI become image
//! blocks; any other image degrades to a link so no external reference can
//! enter a document.

use comrak::{
    nodes::{AstNode, ListType as ComrakListType, NodeValue},
    parse_document, Arena, Options,
};
use log::warn;

use crate::assets::{ingest_data_uri, IngestLimits};
use crate::document::{Block, HeadingLevel, ImageBlock, ListItem, ListKind, Marks, TextRun};

// ─────────────────────────────────────────────────────────────────────────────
// Public API Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Parse Markdown text into document blocks.
///
/// Parsing is total: any input yields a (possibly empty) block sequence.
/// Embedded images are validated against `limits`; rejected ones keep their
/// alt text as plain text.
///
/// # Example
/// ```ignore
/// let blocks = parse_blocks("# Hello\n\nWorld", &IngestLimits::default());
/// assert_eq!(blocks.len(), 2);
/// ```
pub fn parse_blocks(markdown: &str, limits: &IngestLimits) -> Vec<Block> {
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &comrak_options());

    let mut reader = Reader { limits };
    reader.convert_children(root)
}

/// Options for the Markdown dialect the exporter writes.
fn comrak_options() -> Options {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal Conversion Functions
// ─────────────────────────────────────────────────────────────────────────────

/// A piece of inline content: either text, or an image that will be hoisted
/// into its own block.
enum Inline {
    Run(TextRun),
    Image(ImageBlock),
}

struct Reader<'l> {
    limits: &'l IngestLimits,
}

impl<'l> Reader<'l> {
    /// Convert all block children of a container node.
    fn convert_children<'a>(&mut self, node: &'a AstNode<'a>) -> Vec<Block> {
        let mut blocks = Vec::new();
        for child in node.children() {
            self.convert_block(child, &mut blocks);
        }
        blocks
    }

    /// Convert one comrak block node, appending the result to `out`.
    fn convert_block<'a>(&mut self, node: &'a AstNode<'a>, out: &mut Vec<Block>) {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Paragraph => {
                let inlines = self.collect_inlines(node);
                split_paragraph(inlines, out);
            }
            NodeValue::Heading(heading) => {
                let (runs, images) = partition(self.collect_inlines(node));
                out.push(Block::Heading {
                    level: HeadingLevel::from(heading.level),
                    runs,
                });
                out.extend(images.into_iter().map(Block::Image));
            }
            NodeValue::List(list) => {
                let kind = match list.list_type {
                    ComrakListType::Bullet => ListKind::Unordered,
                    ComrakListType::Ordered => ListKind::Ordered,
                };
                let items = node
                    .children()
                    .map(|item| ListItem::new(self.convert_children(item)))
                    .collect();
                out.push(Block::List { kind, items });
            }
            NodeValue::BlockQuote => {
                out.push(Block::Quote(self.convert_children(node)));
            }
            NodeValue::CodeBlock(code) => {
                let language = code.info.split_whitespace().next().unwrap_or("").to_string();
                let code = code
                    .literal
                    .strip_suffix('\n')
                    .unwrap_or(&code.literal)
                    .to_string();
                out.push(Block::CodeBlock { language, code });
            }
            NodeValue::ThematicBreak => out.push(Block::Rule),
            NodeValue::HtmlBlock(html) => {
                let text = html.literal.trim_end();
                if !text.is_empty() {
                    out.push(Block::paragraph(text));
                }
            }
            // Containers we do not model keep their block children
            _ => out.extend(self.convert_children(node)),
        }
    }

    /// Flatten the inline subtree of a node into runs and images.
    fn collect_inlines<'a>(&mut self, node: &'a AstNode<'a>) -> Vec<Inline> {
        let mut out = Vec::new();
        for child in node.children() {
            self.collect_inline(child, Marks::NONE, None, &mut out);
        }
        out
    }

    fn collect_inline<'a>(
        &mut self,
        node: &'a AstNode<'a>,
        marks: Marks,
        link: Option<&str>,
        out: &mut Vec<Inline>,
    ) {
        let value = node.data.borrow().value.clone();
        let run = |text: String, marks: Marks| {
            let mut run = TextRun::new(text, marks);
            run.link = link.map(str::to_string);
            Inline::Run(run)
        };

        match value {
            NodeValue::Text(text) => out.push(run(text, marks)),
            NodeValue::Code(code) => out.push(run(code.literal, marks.union(Marks::CODE))),
            NodeValue::SoftBreak => out.push(run(" ".to_string(), marks)),
            NodeValue::LineBreak => out.push(run("\n".to_string(), marks)),
            NodeValue::HtmlInline(html) => out.push(run(html, marks)),
            NodeValue::Emph => self.collect_nested(node, marks.union(Marks::ITALIC), link, out),
            NodeValue::Strong => self.collect_nested(node, marks.union(Marks::BOLD), link, out),
            NodeValue::Strikethrough => {
                self.collect_nested(node, marks.union(Marks::STRIKETHROUGH), link, out)
            }
            NodeValue::Link(target) => {
                self.collect_nested(node, marks, Some(target.url.as_str()), out)
            }
            NodeValue::Image(target) => {
                let alt = inline_plain_text(node);
                if target.url.starts_with("data:") {
                    match ingest_data_uri(&target.url, self.limits) {
                        Ok(asset) => out.push(Inline::Image(ImageBlock { asset, alt })),
                        Err(e) => {
                            warn!("Dropping embedded image: {}", e);
                            out.push(run(alt, marks));
                        }
                    }
                } else {
                    let label = if alt.is_empty() { target.url.clone() } else { alt };
                    let mut link_run = TextRun::new(label, marks);
                    link_run.link = Some(target.url);
                    out.push(Inline::Run(link_run));
                }
            }
            _ => self.collect_nested(node, marks, link, out),
        }
    }

    fn collect_nested<'a>(
        &mut self,
        node: &'a AstNode<'a>,
        marks: Marks,
        link: Option<&str>,
        out: &mut Vec<Inline>,
    ) {
        for child in node.children() {
            self.collect_inline(child, marks, link, out);
        }
    }
}

/// Split a paragraph's inlines at each image, keeping document order.
fn split_paragraph(inlines: Vec<Inline>, out: &mut Vec<Block>) {
    let mut runs = Vec::new();
    for inline in inlines {
        match inline {
            Inline::Run(run) => runs.push(run),
            Inline::Image(image) => {
                flush_paragraph(&mut runs, out);
                out.push(Block::Image(image));
            }
        }
    }
    flush_paragraph(&mut runs, out);
}

fn flush_paragraph(runs: &mut Vec<TextRun>, out: &mut Vec<Block>) {
    if runs.iter().any(|r| !r.text.trim().is_empty()) {
        out.push(Block::Paragraph(std::mem::take(runs)));
    } else {
        runs.clear();
    }
}

fn partition(inlines: Vec<Inline>) -> (Vec<TextRun>, Vec<ImageBlock>) {
    let mut runs = Vec::new();
    let mut images = Vec::new();
    for inline in inlines {
        match inline {
            Inline::Run(run) => runs.push(run),
            Inline::Image(image) => images.push(image),
        }
    }
    (runs, images)
}

/// Text content of an inline subtree (used for image alt text).
fn inline_plain_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(t) => text.push_str(t),
            NodeValue::Code(c) => text.push_str(&c.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
            _ => text.push_str(&inline_plain_text(child)),
        }
    }
    text
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
