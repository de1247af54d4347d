//! Inline text runs and their formatting marks.

/// The set of formatting marks active on a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
}

impl Marks {
    pub const NONE: Marks = Marks {
        bold: false,
        italic: false,
        strikethrough: false,
        code: false,
    };
    pub const BOLD: Marks = Marks {
        bold: true,
        ..Marks::NONE
    };
    pub const ITALIC: Marks = Marks {
        italic: true,
        ..Marks::NONE
    };
    pub const STRIKETHROUGH: Marks = Marks {
        strikethrough: true,
        ..Marks::NONE
    };
    pub const CODE: Marks = Marks {
        code: true,
        ..Marks::NONE
    };

    /// Marks active in either set.
    pub fn union(self, other: Marks) -> Marks {
        Marks {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            strikethrough: self.strikethrough || other.strikethrough,
            code: self.code || other.code,
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == Marks::NONE
    }
}

/// A contiguous span of text sharing the same marks and link target.
///
/// A `\n` inside the text is a hard line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub marks: Marks,
    pub link: Option<String>,
}

impl TextRun {
    pub fn new(text: impl Into<String>, marks: Marks) -> Self {
        Self {
            text: text.into(),
            marks,
            link: None,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Marks::NONE)
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(text, Marks::BOLD)
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self::new(text, Marks::ITALIC)
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self::new(text, Marks::CODE)
    }

    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    fn same_format(&self, other: &TextRun) -> bool {
        self.marks == other.marks && self.link == other.link
    }
}

/// Bring runs into canonical form: empty runs dropped, adjacent runs with
/// identical marks and link merged.
pub fn normalize_runs(runs: &mut Vec<TextRun>) {
    let mut merged: Vec<TextRun> = Vec::with_capacity(runs.len());
    for run in runs.drain(..) {
        if run.text.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if last.same_format(&run) => last.text.push_str(&run.text),
            _ => merged.push(run),
        }
    }
    *runs = merged;
}

/// Concatenated text of the runs, marks ignored.
pub fn plain_text(runs: &[TextRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}
