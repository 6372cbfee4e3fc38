//! Pure text transformations around a selection.
//!
//! Every function takes the document and the current selection and returns
//! the replacement document plus the selection that should follow it. None of
//! them touch the renderer or storage.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::Selection;

const TABLE_HEADER_CELL: &str = " Header |";
const TABLE_SEPARATOR_CELL: &str = " --- |";
const TABLE_BODY_CELL: &str = " Content |";

/// The result of a splice: the new document and the selection after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub text: String,
    pub selection: Selection,
}

/// Surround the selection with `before` and `after`.
///
/// The selected text stays selected, shifted right by `before.len()`.
pub fn wrap_text(text: &str, selection: Selection, before: &str, after: &str) -> Splice {
    let (start, end) = selection.clamp_to(text).range();
    let mut out = String::with_capacity(text.len() + before.len() + after.len());
    out.push_str(&text[..start]);
    out.push_str(before);
    out.push_str(&text[start..end]);
    out.push_str(after);
    out.push_str(&text[end..]);
    Splice {
        text: out,
        selection: Selection::new(start + before.len(), end + before.len()),
    }
}

/// Prefix and suffix every line of the selection.
///
/// Empty lines produced by consecutive newlines are transformed too. The
/// whole replacement ends up selected.
pub fn wrap_lines(text: &str, selection: Selection, before: &str, after: &str) -> Splice {
    let (start, end) = selection.clamp_to(text).range();
    let modified = text[start..end]
        .split('\n')
        .map(|line| format!("{before}{line}{after}"))
        .collect::<Vec<_>>()
        .join("\n");
    let new_end = start + modified.len();
    Splice {
        text: [&text[..start], modified.as_str(), &text[end..]].concat(),
        selection: Selection::new(start, new_end),
    }
}

/// Replace the selection with `insert` and collapse the caret after it.
pub fn insert_at(text: &str, selection: Selection, insert: &str) -> Splice {
    let (start, end) = selection.clamp_to(text).range();
    Splice {
        text: [&text[..start], insert, &text[end..]].concat(),
        selection: Selection::caret(start + insert.len()),
    }
}

/// Strip bold and italic delimiters from the selected span only.
pub fn clear_formatting(text: &str, selection: Selection) -> Splice {
    let (start, end) = selection.clamp_to(text).range();
    let clean = strip_emphasis(&text[start..end]);
    let new_end = start + clean.len();
    Splice {
        text: [&text[..start], clean.as_str(), &text[end..]].concat(),
        selection: Selection::new(start, new_end),
    }
}

/// Remove `**x**`/`__x__` pairs, then `*x*`/`_x_` pairs, keeping `x`.
///
/// Both passes are non-greedy and never cross a line break, so nested or
/// overlapping markers resolve in whatever order the passes meet them.
pub fn strip_emphasis(input: &str) -> String {
    let bold = bold_pattern().replace_all(input, inner_text);
    italic_pattern().replace_all(&bold, inner_text).into_owned()
}

fn inner_text(caps: &Captures<'_>) -> String {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map_or_else(String::new, |m| m.as_str().to_string())
}

fn bold_pattern() -> &'static Regex {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    BOLD.get_or_init(|| {
        Regex::new(r"\*\*([^\r\n\x{2028}\x{2029}]*?)\*\*|__([^\r\n\x{2028}\x{2029}]*?)__")
            .expect("bold pattern is valid")
    })
}

fn italic_pattern() -> &'static Regex {
    static ITALIC: OnceLock<Regex> = OnceLock::new();
    ITALIC.get_or_init(|| {
        Regex::new(r"\*([^\r\n\x{2028}\x{2029}]*?)\*|_([^\r\n\x{2028}\x{2029}]*?)_")
            .expect("italic pattern is valid")
    })
}

/// Parse a heading level answer. Only whole numbers 1 through 6 count.
pub fn parse_heading_level(answer: &str) -> Option<usize> {
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|level| (1..=6).contains(level))
}

/// Parse a table row or column count.
pub fn parse_dimension(answer: &str) -> Option<usize> {
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n >= 1)
}

/// The `#` run plus trailing space that opens a heading of `level`.
pub fn heading_prefix(level: usize) -> String {
    format!("{} ", "#".repeat(level))
}

/// Build an empty table with one header row, a separator and `rows` body rows.
pub fn table_skeleton(rows: usize, cols: usize) -> String {
    let mut table = String::from("\n\n");
    for cell in [TABLE_HEADER_CELL, TABLE_SEPARATOR_CELL] {
        table.push('|');
        table.push_str(&cell.repeat(cols));
        table.push('\n');
    }
    for _ in 0..rows {
        table.push('|');
        table.push_str(&TABLE_BODY_CELL.repeat(cols));
        table.push('\n');
    }
    table
}
