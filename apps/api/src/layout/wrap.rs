//! Greedy word-wrap into fixed-width lines.
//!
//! `wrap` is independent of any rendering library: it takes a width function
//! and returns paragraphs. `wrap_for_page` binds it to a font metric table and
//! page geometry.
//!
//! # Tokenisation
//! Tokens are separated by spaces, tabs and carriage returns only. Newlines stay
//! inside tokens so that `"Manager,\n\nI"` reaches the embedded-newline branch:
//! the text before the newline closes the current line, one blank paragraph
//! follows, and the text after it starts the next line.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::layout::font_metrics::{get_metrics, is_winansi, PageConfig};

/// One vertical slot of laid-out text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Paragraph {
    /// A line of words. `justify` is set when the line was broken because the
    /// next word would overflow; the last line before a break is flush left.
    Line { text: String, justify: bool },
    /// An empty line separating paragraphs.
    Blank,
}

impl Paragraph {
    pub fn text(&self) -> Option<&str> {
        match self {
            Paragraph::Line { text, .. } => Some(text),
            Paragraph::Blank => None,
        }
    }
}

struct LineBuilder<'a, F> {
    max_width: f32,
    width: &'a F,
    line: String,
    out: Vec<Paragraph>,
}

impl<F: Fn(&str) -> f32> LineBuilder<'_, F> {
    fn push_word(&mut self, word: &str) {
        if self.line.is_empty() {
            // A token wider than the page still gets a line of its own.
            self.line.push_str(word);
            return;
        }

        let candidate = format!("{} {}", self.line, word);
        if (self.width)(&candidate) > self.max_width {
            let full = std::mem::replace(&mut self.line, word.to_string());
            self.out.push(Paragraph::Line {
                text: full,
                justify: true,
            });
        } else {
            self.line = candidate;
        }
    }

    fn flush(&mut self) {
        if !self.line.is_empty() {
            let text = std::mem::take(&mut self.line);
            self.out.push(Paragraph::Line {
                text,
                justify: false,
            });
        }
    }

    fn paragraph_break(&mut self) {
        self.flush();
        if matches!(self.out.last(), Some(Paragraph::Line { .. })) {
            self.out.push(Paragraph::Blank);
        }
    }
}

/// Wraps `text` into lines no wider than `max_width` as measured by `width`.
///
/// Words are never dropped or split. A run of newlines produces exactly one
/// blank paragraph, and the output never starts or ends with a blank.
pub fn wrap<F>(text: &str, max_width: f32, width: F) -> Vec<Paragraph>
where
    F: Fn(&str) -> f32,
{
    let mut builder = LineBuilder {
        max_width,
        width: &width,
        line: String::new(),
        out: Vec::new(),
    };

    let tokens = text
        .split([' ', '\t', '\r'])
        .filter(|token| !token.is_empty());

    for token in tokens {
        if !token.contains('\n') {
            builder.push_word(token);
            continue;
        }

        for (i, fragment) in token.split('\n').enumerate() {
            if i > 0 {
                builder.paragraph_break();
            }
            if !fragment.is_empty() {
                builder.push_word(fragment);
            }
        }
    }
    builder.flush();

    if builder.out.last() == Some(&Paragraph::Blank) {
        builder.out.pop();
    }
    builder.out
}

/// Wraps `text` to the printable width of `config` using its font metrics.
pub fn wrap_for_page(text: &str, config: &PageConfig) -> Vec<Paragraph> {
    let metrics = get_metrics(&config.font);
    wrap(text, config.text_width_em(), |s| metrics.measure_str(s))
}

/// Splits paragraphs into pages of at most `lines_per_page` slots.
///
/// A blank paragraph that would open a new page is dropped.
pub fn paginate(paragraphs: &[Paragraph], lines_per_page: usize) -> Vec<Vec<Paragraph>> {
    let capacity = lines_per_page.max(1);
    let mut pages: Vec<Vec<Paragraph>> = Vec::new();
    let mut current: Vec<Paragraph> = Vec::new();

    for paragraph in paragraphs {
        if current.len() == capacity {
            pages.push(std::mem::take(&mut current));
        }
        if current.is_empty() && *paragraph == Paragraph::Blank {
            continue;
        }
        current.push(paragraph.clone());
    }
    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}

/// Maps text onto what the base-14 fonts can draw.
///
/// Typographic punctuation becomes its ASCII look-alike. Any other character
/// with no WinAnsi byte becomes `?`, so a glyph is never dropped silently and
/// measured widths match the drawn text.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut replaced = 0usize;
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' | '\u{2009}' | '\u{202F}' => out.push(' '),
            '\u{2022}' => out.push('*'),
            '\n' | '\t' | '\r' => out.push(c),
            c if is_winansi(c) => out.push(c),
            _ => {
                out.push('?');
                replaced += 1;
            }
        }
    }
    if replaced > 0 {
        warn!("Replaced {replaced} character(s) the PDF fonts cannot draw with '?'");
    }
    out
}
