//! HTML Export Generation
//!
//! This module renders documents to HTML. `to_html` produces a complete
//! standalone page with inlined CSS; `to_html_fragment` produces the body
//! markup alone, for pasting into other applications.

use super::options::HtmlOptions;
use crate::document::{Block, Document, ImageBlock, ListItem, ListKind, TextRun};
use html_escape::{encode_double_quoted_attribute, encode_text};

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Generate a complete HTML document.
///
/// The page declares UTF-8, sets the title from `options` and constrains
/// images to the content width. Image sources are the assets' inline
/// references, so the file displays without anything next to it.
pub fn to_html(doc: &Document, options: &HtmlOptions) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="dad-notes">
    <title>{title}</title>
    <style>
{base_css}
    </style>
</head>
<body>
    <article class="document">
{body}
    </article>
</body>
</html>
"#,
        title = encode_text(&options.title),
        base_css = BASE_CSS,
        body = to_html_fragment(doc),
    )
}

/// Generate the HTML body markup (no doctype, head, etc.).
pub fn to_html_fragment(doc: &Document) -> String {
    debug_assert!(doc.is_canonical(), "export of a non-canonical document");
    render_blocks(doc.blocks())
}

// ─────────────────────────────────────────────────────────────────────────────
// Blocks
// ─────────────────────────────────────────────────────────────────────────────

fn render_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Paragraph(runs) => format!("<p>{}</p>", render_inline(runs)),
        Block::Heading { level, runs } => {
            let n = level.level();
            format!("<h{n}>{}</h{n}>", render_inline(runs))
        }
        Block::List { kind, items } => {
            let tag = match kind {
                ListKind::Unordered => "ul",
                ListKind::Ordered => "ol",
            };
            let items = items
                .iter()
                .map(|item| format!("<li>{}</li>", render_item(item)))
                .collect::<Vec<_>>()
                .join("\n");
            format!("<{tag}>\n{items}\n</{tag}>")
        }
        Block::Image(image) => render_image(image),
        Block::Quote(blocks) => format!("<blockquote>\n{}\n</blockquote>", render_blocks(blocks)),
        Block::CodeBlock { language, code } => {
            let class = if language.is_empty() {
                String::new()
            } else {
                format!(
                    r#" class="language-{}""#,
                    encode_double_quoted_attribute(language)
                )
            };
            format!("<pre><code{}>{}</code></pre>", class, encode_text(code))
        }
        Block::Rule => "<hr>".to_string(),
    }
}

/// An item holding a single paragraph renders its text inline.
fn render_item(item: &ListItem) -> String {
    match item.blocks.as_slice() {
        [Block::Paragraph(runs)] => render_inline(runs),
        blocks => format!("\n{}\n", render_blocks(blocks)),
    }
}

fn render_image(image: &ImageBlock) -> String {
    format!(
        r#"<img src="{}" alt="{}">"#,
        encode_double_quoted_attribute(image.asset.inline_reference()),
        encode_double_quoted_attribute(&image.alt)
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Content
// ─────────────────────────────────────────────────────────────────────────────

fn render_inline(runs: &[TextRun]) -> String {
    let mut out = String::new();
    for group in runs.chunk_by(|a, b| a.link == b.link) {
        let inner: String = group.iter().map(render_run).collect();
        match &group[0].link {
            Some(url) => {
                out.push_str(&format!(
                    r#"<a href="{}">{}</a>"#,
                    encode_double_quoted_attribute(safe_href(url)),
                    inner
                ));
            }
            None => out.push_str(&inner),
        }
    }
    out
}

fn render_run(run: &TextRun) -> String {
    let mut html = encode_text(&run.text).replace('\n', "<br>\n");
    if run.marks.code {
        html = format!("<code>{}</code>", html);
    }
    if run.marks.strikethrough {
        html = format!("<s>{}</s>", html);
    }
    if run.marks.italic {
        html = format!("<em>{}</em>", html);
    }
    if run.marks.bold {
        html = format!("<strong>{}</strong>", html);
    }
    html
}

/// Link targets with a script scheme are neutralized.
///
/// The scheme is read the way a browser reads it: leading and trailing
/// control characters and spaces are ignored, and so is every tab or line
/// break.
fn safe_href(url: &str) -> &str {
    let scheme: String = url
        .trim_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .take_while(|c| *c != ':')
        .collect();
    let has_scheme = url.contains(':');
    match scheme.to_ascii_lowercase().as_str() {
        "javascript" | "vbscript" if has_scheme => "#",
        _ => url,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS
// ─────────────────────────────────────────────────────────────────────────────

/// Base CSS for the standalone page (layout, typography).
const BASE_CSS: &str = r#"
*, *::before, *::after {
    box-sizing: border-box;
}

body {
    margin: 0;
    padding: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
    font-size: 16px;
    line-height: 1.6;
    color: #1f2328;
    background-color: #ffffff;
}

.document {
    max-width: 760px;
    margin: 0 auto;
    padding: 32px 24px;
}

.document h1,
.document h2,
.document h3,
.document h4,
.document h5,
.document h6 {
    margin-top: 24px;
    margin-bottom: 16px;
    font-weight: 600;
    line-height: 1.25;
}

.document h1 { font-size: 2em; }
.document h2 { font-size: 1.5em; }
.document h3 { font-size: 1.25em; }
.document h4 { font-size: 1em; }
.document h5 { font-size: 0.875em; }
.document h6 { font-size: 0.85em; }

.document p {
    margin-top: 0;
    margin-bottom: 16px;
}

.document ul,
.document ol {
    margin-top: 0;
    margin-bottom: 16px;
    padding-left: 2em;
}

.document blockquote {
    margin: 0 0 16px 0;
    padding: 0 1em;
    color: #59636e;
    border-left: 4px solid #d1d9e0;
}

.document code {
    font-family: 'JetBrains Mono', 'Fira Code', 'Consolas', 'Monaco', monospace;
    font-size: 0.9em;
    padding: 0.2em 0.4em;
    border-radius: 4px;
    background-color: #f6f8fa;
}

.document pre {
    padding: 16px;
    overflow: auto;
    border-radius: 6px;
    line-height: 1.45;
    background-color: #f6f8fa;
}

.document pre code {
    padding: 0;
    background: transparent;
}

.document hr {
    height: 2px;
    margin: 24px 0;
    border: none;
    background-color: #d1d9e0;
}

.document img {
    display: block;
    max-width: 100%;
    height: auto;
    margin: 0 0 16px 0;
    border-radius: 4px;
}
"#;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
