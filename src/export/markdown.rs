//! Markdown Export
//!
//! This module serializes a document directly into CommonMark text. Blocks
//! are separated by exactly one blank line, list numbering restarts for
//! every list, and literal markup characters in text are backslash-escaped
//! so they read back as text.

use crate::document::{Block, Document, ImageBlock, ListItem, ListKind, TextRun};
use regex::Regex;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize a document to Markdown.
///
/// The output has no trailing newline, so a single paragraph exports as
/// exactly its text.
pub fn to_markdown(doc: &Document) -> String {
    debug_assert!(doc.is_canonical(), "export of a non-canonical document");
    render_sequence(doc.blocks(), false)
}

// ─────────────────────────────────────────────────────────────────────────────
// Blocks
// ─────────────────────────────────────────────────────────────────────────────

const RULE: &str = "---";
/// A rule drawn with a character no list marker uses.
const ITEM_RULE: &str = "___";

/// Render a block sequence.
///
/// In a tight sequence (inside a list item) a nested list follows its
/// paragraph on the next line instead of after a blank line. Adjacent lists
/// of the same kind alternate their delimiter, otherwise Markdown would
/// read them back as one list.
fn render_sequence(blocks: &[Block], tight: bool) -> String {
    let mut out = String::new();
    let mut last_list: Option<(ListKind, bool)> = None;

    for block in blocks {
        let rendered = match block {
            Block::List { kind, items } => {
                let alternate = matches!(last_list, Some((k, alt)) if k == *kind && !alt);
                last_list = Some((*kind, alternate));
                render_list(*kind, items, alternate)
            }
            other => {
                last_list = None;
                render_block(other)
            }
        };
        if rendered.is_empty() {
            continue;
        }
        if !out.is_empty() {
            let separator = if tight && matches!(block, Block::List { .. }) {
                "\n"
            } else {
                "\n\n"
            };
            out.push_str(separator);
        }
        out.push_str(&rendered);
    }
    out
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Paragraph(runs) => render_paragraph(runs),
        Block::Heading { level, runs } => {
            let hashes = "#".repeat(level.level() as usize);
            let text = finish_inline(render_inline(runs, false));
            if text.is_empty() {
                hashes
            } else {
                format!("{} {}", hashes, text)
            }
        }
        Block::List { kind, items } => render_list(*kind, items, false),
        Block::Image(image) => render_image(image),
        Block::Quote(blocks) => prefix_lines(&render_sequence(blocks, false), "> ", ">"),
        Block::CodeBlock { language, code } => {
            let fence = code_fence(code);
            format!("{fence}{language}\n{code}\n{fence}")
        }
        Block::Rule => RULE.to_string(),
    }
}

fn render_paragraph(runs: &[TextRun]) -> String {
    let mut segs = render_inline(runs, true);
    if segs.iter().all(|seg| seg.is_blank() || seg.is_hard_break()) {
        return String::new();
    }
    // A hard break at either edge of a paragraph has no effect
    while segs.last().is_some_and(Seg::is_hard_break) {
        segs.pop();
    }
    let leading = segs.iter().take_while(|seg| seg.is_hard_break()).count();
    segs.drain(..leading);
    escape_line_starts(&finish_inline(segs))
}

fn render_list(kind: ListKind, items: &[ListItem], alternate: bool) -> String {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let marker = match (kind, alternate) {
                (ListKind::Unordered, false) => "- ".to_string(),
                (ListKind::Unordered, true) => "* ".to_string(),
                (ListKind::Ordered, false) => format!("{}. ", index + 1),
                (ListKind::Ordered, true) => format!("{}) ", index + 1),
            };
            let mut body = render_sequence(&item.blocks, true);
            if matches!(item.blocks.first(), Some(Block::Rule)) {
                // `- ---` would read back as a rule outside the list
                body.replace_range(..RULE.len(), ITEM_RULE);
            }
            if body.is_empty() {
                return marker.trim_end().to_string();
            }

            let indent = " ".repeat(marker.len());
            let mut out = String::new();
            for (n, line) in body.split('\n').enumerate() {
                if n == 0 {
                    out.push_str(&marker);
                } else {
                    out.push('\n');
                    if !line.is_empty() {
                        out.push_str(&indent);
                    }
                }
                out.push_str(line);
            }
            out
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_image(image: &ImageBlock) -> String {
    format!(
        "![{}]({})",
        escape_text(&image.alt, false),
        link_destination(image.asset.inline_reference())
    )
}

/// Prefix every line, using `empty` for blank lines.
fn prefix_lines(text: &str, prefix: &str, empty: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                empty.to_string()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A backtick fence longer than any backtick run in the code.
fn code_fence(code: &str) -> String {
    "`".repeat((longest_run(code, '`') + 1).max(3))
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Content
// ─────────────────────────────────────────────────────────────────────────────

const HARD_BREAK: &str = "\\\n";

/// A piece of rendered inline Markdown.
#[derive(Debug)]
enum Seg {
    /// A literal character, written as a numeric character reference when
    /// `encoded` is set
    Char { c: char, encoded: bool },
    /// Escapes and other markup, written as is
    Raw(String),
    /// An emphasis or strikethrough delimiter run
    Delim { ch: char, len: usize, open: bool },
}

impl Seg {
    fn literal(c: char) -> Self {
        Seg::Char { c, encoded: false }
    }

    fn write(&self, out: &mut String) {
        match self {
            Seg::Char { c, encoded: false } => out.push(*c),
            Seg::Char { c, encoded: true } => out.push_str(&format!("&#{};", *c as u32)),
            Seg::Raw(text) => out.push_str(text),
            Seg::Delim { ch, len, .. } => out.extend(std::iter::repeat(*ch).take(*len)),
        }
    }

    fn rendered(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }

    fn is_hard_break(&self) -> bool {
        matches!(self, Seg::Raw(text) if text == HARD_BREAK)
    }

    fn is_blank(&self) -> bool {
        matches!(self, Seg::Char { c: ' ' | '\t', .. })
    }

    fn encode(&mut self) {
        if let Seg::Char { encoded, .. } = self {
            *encoded = true;
        }
    }
}

/// Render runs, grouping consecutive runs that share a link target.
fn render_inline(runs: &[TextRun], allow_breaks: bool) -> Vec<Seg> {
    let mut segs = Vec::new();
    for group in runs.chunk_by(|a, b| a.link == b.link) {
        let link = group[0].link.as_deref();
        if link.is_some() {
            segs.push(Seg::Raw("[".to_string()));
        }
        for run in group {
            render_run(run, allow_breaks, &mut segs);
        }
        if let Some(url) = link {
            segs.push(Seg::Raw(format!("]({})", link_destination(url))));
        }
    }
    segs
}

/// Write out inline segments that make up whole lines.
fn finish_inline(mut segs: Vec<Seg>) -> String {
    protect_line_edges(&mut segs);
    guard_delimiters(&mut segs);
    let mut out = String::new();
    for seg in &segs {
        seg.write(&mut out);
    }
    out
}

fn render_run(run: &TextRun, allow_breaks: bool, segs: &mut Vec<Seg>) {
    let text = if allow_breaks {
        run.text.clone()
    } else {
        run.text.replace('\n', " ")
    };

    if run.marks.code {
        // Code spans cannot hold line breaks
        let span = code_span(&text.replace('\n', " "));
        push_marked(segs, run, |segs| segs.push(Seg::Raw(span)));
        return;
    }

    // Delimiters must touch non-whitespace, so edge whitespace goes outside
    let core = text.trim();
    if core.is_empty() || run.marks.is_plain() {
        push_escaped(segs, &text, allow_breaks);
        return;
    }
    let start = text.len() - text.trim_start().len();
    let end = start + core.len();

    push_escaped(segs, &text[..start], allow_breaks);
    push_marked(segs, run, |segs| push_escaped(segs, core, allow_breaks));
    push_escaped(segs, &text[end..], allow_breaks);
}

/// Wrap the segments written by `body` in delimiters for the run's marks,
/// outermost first: bold, italic, strikethrough.
fn push_marked(segs: &mut Vec<Seg>, run: &TextRun, body: impl FnOnce(&mut Vec<Seg>)) {
    // Asterisks right after a closing asterisk run would merge with it
    let emphasis = match segs.last() {
        Some(Seg::Delim { ch: '*', open: false, .. }) => '_',
        _ => '*',
    };
    let mut delims = Vec::new();
    if run.marks.bold {
        delims.push((emphasis, 2));
    }
    if run.marks.italic {
        delims.push((emphasis, 1));
    }
    if run.marks.strikethrough {
        delims.push(('~', 2));
    }

    // Neighbouring struck runs share one pair of tildes
    let shares_strike = delims.first() == Some(&('~', 2))
        && matches!(segs.last(), Some(Seg::Delim { ch: '~', open: false, .. }));
    if shares_strike {
        segs.pop();
    }

    for (index, &(ch, len)) in delims.iter().enumerate() {
        if !(shares_strike && index == 0) {
            segs.push(Seg::Delim { ch, len, open: true });
        }
    }
    body(segs);
    for &(ch, len) in delims.iter().rev() {
        segs.push(Seg::Delim { ch, len, open: false });
    }
}

fn push_escaped(segs: &mut Vec<Seg>, text: &str, allow_breaks: bool) {
    for c in text.chars() {
        match c {
            '\\' | '*' | '_' | '#' | '[' | ']' | '`' | '~' | '<' | '&' => {
                segs.push(Seg::Raw(format!("\\{}", c)));
            }
            '\n' if allow_breaks => segs.push(Seg::Raw(HARD_BREAK.to_string())),
            '\n' => segs.push(Seg::literal(' ')),
            _ => segs.push(Seg::literal(c)),
        }
    }
}

/// Escape characters that would otherwise be read as markup.
fn escape_text(text: &str, allow_breaks: bool) -> String {
    let mut segs = Vec::new();
    push_escaped(&mut segs, text, allow_breaks);
    segs.iter().map(Seg::rendered).collect()
}

/// Spaces and tabs at either end of a line would be stripped or read as
/// indentation, so they are written as character references.
fn protect_line_edges(segs: &mut [Seg]) {
    for line in segs.split_mut(Seg::is_hard_break) {
        let leading = line.iter().take_while(|seg| seg.is_blank()).count();
        let (head, rest) = line.split_at_mut(leading);
        let trailing = rest.iter().rev().take_while(|seg| seg.is_blank()).count();
        let tail_start = rest.len() - trailing;
        for seg in head.iter_mut().chain(rest[tail_start..].iter_mut()) {
            seg.encode();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Delimiter Flanking
// ─────────────────────────────────────────────────────────────────────────────

/// Make every delimiter run able to open or close where it stands.
///
/// An opening run followed by punctuation only opens after whitespace or
/// punctuation, and a closing run preceded by punctuation only closes before
/// either. Underscore runs never open or close inside a word. When a literal
/// character on the outside breaks that rule it is written as a character
/// reference, which the reader sees as punctuation.
fn guard_delimiters(segs: &mut [Seg]) {
    let mut index = 0;
    while index < segs.len() {
        let (ch, open) = match &segs[index] {
            Seg::Delim { ch, open, .. } => (*ch, *open),
            _ => {
                index += 1;
                continue;
            }
        };
        let mut end = index + 1;
        while matches!(segs.get(end), Some(Seg::Delim { ch: next, .. }) if *next == ch) {
            end += 1;
        }

        let before = char_before(segs, index);
        let after = char_after(segs, end);
        let (outside, inside) = if open { (before, after) } else { (after, before) };
        if let Some((at, c)) = outside {
            let blocked = ch == '_' || inside.is_some_and(|(_, c)| may_be_punctuation(c));
            if blocked && is_word_like(c) {
                segs[at].encode();
            }
        }
        index = end;
    }
}

/// The nearest rendered character before `segs[index]`, skipping tildes.
fn char_before(segs: &[Seg], index: usize) -> Option<(usize, char)> {
    segs[..index]
        .iter()
        .enumerate()
        .rev()
        .find_map(|(at, seg)| seg.rendered().chars().rev().find(|c| *c != '~').map(|c| (at, c)))
}

/// The nearest rendered character from `segs[index]` on, skipping tildes.
fn char_after(segs: &[Seg], index: usize) -> Option<(usize, char)> {
    segs[index..]
        .iter()
        .enumerate()
        .find_map(|(at, seg)| {
            seg.rendered()
                .chars()
                .find(|c| *c != '~')
                .map(|c| (index + at, c))
        })
}

/// ASCII characters in the Unicode punctuation categories.
fn is_punctuation(c: char) -> bool {
    matches!(
        c,
        '!' | '"' | '#' | '%' | '&' | '\'' | '(' | ')' | '*' | ',' | '-' | '.' | '/' | ':'
            | ';' | '?' | '@' | '[' | '\\' | ']' | '_' | '{' | '}'
    )
}

/// Neither whitespace nor known punctuation.
fn is_word_like(c: char) -> bool {
    !c.is_whitespace() && !is_punctuation(c)
}

fn may_be_punctuation(c: char) -> bool {
    !c.is_whitespace() && !c.is_alphanumeric()
}

fn code_span(code: &str) -> String {
    let fence = "`".repeat(longest_run(code, '`') + 1);
    let needs_padding = code.starts_with('`')
        || code.ends_with('`')
        || (code.starts_with(' ') && code.ends_with(' ') && !code.trim().is_empty());
    if needs_padding {
        format!("{fence} {code} {fence}")
    } else {
        format!("{fence}{code}{fence}")
    }
}

/// Escape line starts that would open a list, quote or setext heading.
fn escape_line_starts(text: &str) -> String {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    static NUMBERED: OnceLock<Regex> = OnceLock::new();

    let marker = MARKER.get_or_init(|| Regex::new(r"(?m)^( {0,3})([-+>=])").expect("valid regex"));
    let numbered =
        NUMBERED.get_or_init(|| Regex::new(r"(?m)^( {0,3}\d{1,9})([.)])").expect("valid regex"));

    let text = marker.replace_all(text, "${1}\\${2}");
    numbered.replace_all(&text, "${1}\\${2}").into_owned()
}

/// Link target, wrapped in angle brackets when it holds characters that
/// would end a bare destination.
fn link_destination(url: &str) -> String {
    let url = url.replace('\n', "%0A");
    if url.is_empty() || url.contains([' ', '(', ')', '<', '>']) {
        format!("<{}>", url.replace('<', "%3C").replace('>', "%3E"))
    } else {
        url
    }
}

fn longest_run(text: &str, needle: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == needle {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Asset, IngestLimits};
    use crate::document::{HeadingLevel, Marks};
    use crate::markdown::parse_blocks;

    fn md(blocks: Vec<Block>) -> String {
        to_markdown(&Document::new(blocks))
    }

    fn assert_reads_back(blocks: Vec<Block>) {
        let doc = Document::new(blocks);
        let markdown = to_markdown(&doc);
        let reread = Document::new(parse_blocks(&markdown, &IngestLimits::default()));
        assert_eq!(reread, doc, "markdown was:\n{}", markdown);
    }

    #[test]
    fn test_placeholder_paragraph_exports_verbatim() {
        assert_eq!(to_markdown(&Document::default()), "Start writing ✍️");
    }

    #[test]
    fn test_headings() {
        assert_eq!(md(vec![Block::heading(HeadingLevel::H1, "Title")]), "# Title");
        assert_eq!(md(vec![Block::heading(HeadingLevel::H3, "Sub")]), "### Sub");
    }

    #[test]
    fn test_blocks_separated_by_one_blank_line() {
        let out = md(vec![
            Block::heading(HeadingLevel::H2, "Plan"),
            Block::paragraph("one"),
            Block::Paragraph(Vec::new()),
            Block::paragraph("two"),
        ]);
        assert_eq!(out, "## Plan\n\none\n\ntwo");
    }

    #[test]
    fn test_ordered_list_numbering_is_local() {
        let out = md(vec![
            Block::list(
                ListKind::Ordered,
                vec![ListItem::text("a"), ListItem::text("b"), ListItem::text("c")],
            ),
            Block::paragraph("between"),
            Block::list(ListKind::Ordered, vec![ListItem::text("x"), ListItem::text("y")]),
        ]);
        assert_eq!(out, "1. a\n2. b\n3. c\n\nbetween\n\n1. x\n2. y");
    }

    #[test]
    fn test_unordered_list() {
        let out = md(vec![Block::list(
            ListKind::Unordered,
            vec![ListItem::text("milk"), ListItem::text("eggs")],
        )]);
        assert_eq!(out, "- milk\n- eggs");
    }

    #[test]
    fn test_nested_list_is_indented_by_marker_width() {
        let out = md(vec![Block::list(
            ListKind::Ordered,
            vec![ListItem::new(vec![
                Block::paragraph("outer"),
                Block::list(ListKind::Unordered, vec![ListItem::text("inner")]),
            ])],
        )]);
        assert_eq!(out, "1. outer\n   - inner");
    }

    #[test]
    fn test_adjacent_lists_alternate_delimiters() {
        let out = md(vec![
            Block::list(ListKind::Unordered, vec![ListItem::text("a")]),
            Block::list(ListKind::Unordered, vec![ListItem::text("b")]),
            Block::list(ListKind::Unordered, vec![ListItem::text("c")]),
        ]);
        assert_eq!(out, "- a\n\n* b\n\n- c");
    }

    #[test]
    fn test_bold_and_italic_marks() {
        assert_eq!(
            md(vec![Block::Paragraph(vec![
                TextRun::plain("a "),
                TextRun::bold("bold"),
                TextRun::plain(" and "),
                TextRun::italic("italic"),
            ])]),
            "a **bold** and *italic*"
        );

        assert_reads_back(vec![Block::Paragraph(vec![
            TextRun::plain("a "),
            TextRun::bold("bold"),
            TextRun::plain(" and "),
            TextRun::italic("italic"),
            TextRun::new("both", Marks::BOLD.union(Marks::ITALIC)),
        ])]);
    }

    #[test]
    fn test_emphasis_next_to_punctuation_keeps_its_marks() {
        let out = md(vec![Block::Paragraph(vec![
            TextRun::plain("a"),
            TextRun::bold("(x)"),
            TextRun::plain("b"),
        ])]);
        assert_eq!(out, "&#97;**(x)**&#98;");

        assert_eq!(
            md(vec![Block::Paragraph(vec![TextRun::bold("end."), TextRun::plain("Next")])]),
            "**end.**&#78;ext"
        );

        // Spaces already let the delimiters open and close
        assert_eq!(
            md(vec![Block::Paragraph(vec![
                TextRun::plain("say "),
                TextRun::italic("\"hi\""),
                TextRun::plain(" now"),
            ])]),
            "say *\"hi\"* now"
        );
    }

    #[test]
    fn test_adjacent_emphasis_switches_delimiter() {
        let out = md(vec![Block::Paragraph(vec![
            TextRun::bold("a."),
            TextRun::italic("b"),
        ])]);
        assert_eq!(out, "**a.**_b_");
    }

    #[test]
    fn test_neighbouring_struck_runs_share_tildes() {
        let strike_code = Marks::STRIKETHROUGH.union(Marks::CODE);
        let out = md(vec![Block::Paragraph(vec![
            TextRun::new("a", Marks::STRIKETHROUGH),
            TextRun::new("b", strike_code),
        ])]);
        assert_eq!(out, "~~a`b`~~");
    }

    #[test]
    fn test_marked_runs_read_back() {
        let bold_strike = Marks::BOLD.union(Marks::STRIKETHROUGH);
        let cases = vec![
            vec![TextRun::plain("a"), TextRun::bold("(x)"), TextRun::plain("b")],
            vec![TextRun::bold("end."), TextRun::plain("Next")],
            vec![TextRun::plain("x"), TextRun::bold("*"), TextRun::plain("y")],
            vec![TextRun::plain("x"), TextRun::italic("_"), TextRun::plain("y")],
            vec![TextRun::bold("a."), TextRun::italic("b"), TextRun::plain("c")],
            vec![TextRun::italic("a"), TextRun::bold("!"), TextRun::italic("b")],
            vec![TextRun::plain("a"), TextRun::new("[1]", bold_strike), TextRun::plain("b")],
            vec![TextRun::new("x", Marks::STRIKETHROUGH), TextRun::bold("(y)")],
            vec![
                TextRun::new("a", Marks::STRIKETHROUGH),
                TextRun::new("b", Marks::STRIKETHROUGH.union(Marks::CODE)),
            ],
            vec![
                TextRun::plain("see "),
                TextRun::bold("(docs)").with_link("https://docs.rs"),
                TextRun::plain("now"),
            ],
        ];
        for runs in cases {
            assert_reads_back(vec![Block::Paragraph(runs)]);
        }
    }

    #[test]
    fn test_leading_whitespace_is_not_indentation() {
        assert_eq!(
            md(vec![Block::paragraph("    indented text")]),
            "&#32;&#32;&#32;&#32;indented text"
        );
        assert_eq!(md(vec![Block::paragraph("\tx")]), "&#9;x");
        assert_eq!(md(vec![Block::paragraph("a\n  b")]), "a\\\n&#32;&#32;b");

        assert_reads_back(vec![Block::paragraph("    indented text")]);
        assert_reads_back(vec![Block::paragraph("\tx")]);
        assert_reads_back(vec![Block::paragraph("one\n  two  ")]);
        assert_reads_back(vec![Block::heading(HeadingLevel::H2, "  spaced  ")]);
        assert_eq!(
            md(vec![Block::paragraph("   "), Block::paragraph("kept")]),
            "kept"
        );
    }

    #[test]
    fn test_indented_paragraph_after_list_stays_outside() {
        assert_reads_back(vec![
            Block::list(ListKind::Unordered, vec![ListItem::text("a")]),
            Block::paragraph("  tail"),
        ]);
    }

    #[test]
    fn test_rule_opening_a_list_item() {
        let rule_item = || ListItem::new(vec![Block::Rule, Block::paragraph("after")]);
        assert_eq!(
            md(vec![Block::list(ListKind::Unordered, vec![ListItem::new(vec![Block::Rule])])]),
            "- ___"
        );

        assert_reads_back(vec![Block::list(
            ListKind::Unordered,
            vec![ListItem::new(vec![Block::Rule])],
        )]);
        assert_reads_back(vec![
            Block::list(ListKind::Unordered, vec![ListItem::text("a")]),
            Block::list(ListKind::Unordered, vec![rule_item()]),
            Block::list(ListKind::Ordered, vec![rule_item()]),
        ]);
    }

    #[test]
    fn test_edge_whitespace_moves_outside_delimiters() {
        let out = md(vec![Block::Paragraph(vec![
            TextRun::plain("x"),
            TextRun::bold(" y "),
            TextRun::plain("z"),
        ])]);
        assert_eq!(out, "x **y** z");
    }

    #[test]
    fn test_markup_characters_are_escaped() {
        let out = md(vec![Block::paragraph("2*3 = 6_ok #1 [x]")]);
        assert_eq!(out, "2\\*3 = 6\\_ok \\#1 \\[x\\]");
    }

    #[test]
    fn test_line_start_markers_are_escaped() {
        assert_eq!(md(vec![Block::paragraph("- not a list")]), "\\- not a list");
        assert_eq!(md(vec![Block::paragraph("1. not a list")]), "1\\. not a list");
        assert_eq!(md(vec![Block::paragraph("> no quote")]), "\\> no quote");
    }

    #[test]
    fn test_hard_breaks() {
        let out = md(vec![Block::paragraph("line one\nline two\n")]);
        assert_eq!(out, "line one\\\nline two");
    }

    #[test]
    fn test_inline_code_and_links() {
        let out = md(vec![Block::Paragraph(vec![
            TextRun::plain("run "),
            TextRun::code("a `tick`"),
            TextRun::plain(" see "),
            TextRun::plain("docs").with_link("https://docs.rs"),
        ])]);
        assert_eq!(out, "run `` a `tick` `` see [docs](https://docs.rs)");
    }

    #[test]
    fn test_image_uses_inline_reference() {
        let asset = Asset::from_bytes("image/png", b"hello");
        let out = md(vec![Block::image(asset, "")]);
        assert_eq!(out, "![](data:image/png;base64,aGVsbG8=)");
    }

    #[test]
    fn test_quote_code_and_rule() {
        let out = md(vec![
            Block::Quote(vec![Block::paragraph("first"), Block::paragraph("second")]),
            Block::CodeBlock {
                language: "sh".to_string(),
                code: "echo ```".to_string(),
            },
            Block::Rule,
        ]);
        assert_eq!(
            out,
            "> first\n>\n> second\n\n````sh\necho ```\n````\n\n---"
        );
    }

    #[test]
    fn test_export_is_deterministic() {
        let doc = Document::new(vec![
            Block::heading(HeadingLevel::H1, "Trip"),
            Block::list(ListKind::Ordered, vec![ListItem::text("pack")]),
        ]);
        assert_eq!(to_markdown(&doc), to_markdown(&doc));
    }

    #[test]
    fn test_output_reads_back_to_the_same_document() {
        let asset = Asset::from_bytes("image/png", b"pixels");
        let doc = Document::new(vec![
            Block::heading(HeadingLevel::H2, "Notes *for* [later]"),
            Block::Paragraph(vec![
                TextRun::plain("a"),
                TextRun::bold("(x)"),
                TextRun::plain("b"),
            ]),
            Block::Paragraph(vec![
                TextRun::plain("Buy "),
                TextRun::bold("2*3"),
                TextRun::plain(" items_now & "),
                TextRun::italic("soon"),
            ]),
            Block::list(
                ListKind::Unordered,
                vec![
                    ListItem::text("- dash"),
                    ListItem::new(vec![
                        Block::paragraph("parent"),
                        Block::list(ListKind::Ordered, vec![ListItem::text("child")]),
                    ]),
                ],
            ),
            Block::image(asset, "pic"),
            Block::Quote(vec![Block::paragraph("wise words")]),
            Block::Rule,
        ]);

        let markdown = to_markdown(&doc);
        let reread = Document::new(parse_blocks(&markdown, &IngestLimits::default()));
        assert_eq!(reread, doc, "markdown was:\n{}", markdown);
    }
}
