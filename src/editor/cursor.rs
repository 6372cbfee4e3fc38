//! Caret movement over a flat string.
//!
//! Positions are byte offsets that always sit on a char boundary. Columns
//! are counted in chars so vertical movement lines up on multibyte text.

/// A caret movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    WordLeft,
    WordRight,
    DocStart,
    DocEnd,
}

/// Apply `motion` to the caret at `pos`.
pub fn apply(text: &str, pos: usize, motion: Motion) -> usize {
    match motion {
        Motion::Left => prev_char(text, pos),
        Motion::Right => next_char(text, pos),
        Motion::Up => line_up(text, pos),
        Motion::Down => line_down(text, pos),
        Motion::LineStart => line_start(text, pos),
        Motion::LineEnd => line_end(text, pos),
        Motion::WordLeft => word_left(text, pos),
        Motion::WordRight => word_right(text, pos),
        Motion::DocStart => 0,
        Motion::DocEnd => text.len(),
    }
}

pub fn prev_char(text: &str, pos: usize) -> usize {
    text[..pos.min(text.len())]
        .char_indices()
        .next_back()
        .map_or(0, |(idx, _)| idx)
}

pub fn next_char(text: &str, pos: usize) -> usize {
    let pos = pos.min(text.len());
    text[pos..]
        .chars()
        .next()
        .map_or(pos, |ch| pos + ch.len_utf8())
}

pub fn line_start(text: &str, pos: usize) -> usize {
    text[..pos.min(text.len())].rfind('\n').map_or(0, |idx| idx + 1)
}

pub fn line_end(text: &str, pos: usize) -> usize {
    let pos = pos.min(text.len());
    text[pos..].find('\n').map_or(text.len(), |idx| pos + idx)
}

/// Number of lines; an empty document has one.
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Zero-based line and char column of `pos`.
pub fn line_col(text: &str, pos: usize) -> (usize, usize) {
    let pos = pos.min(text.len());
    let start = line_start(text, pos);
    let line = text[..start].matches('\n').count();
    (line, text[start..pos].chars().count())
}

/// Byte offset of `(line, col)`, clamped to the document and line length.
pub fn offset_of(text: &str, line: usize, col: usize) -> usize {
    let mut start = 0;
    for _ in 0..line {
        match text[start..].find('\n') {
            Some(idx) => start += idx + 1,
            None => return text.len(),
        }
    }
    let end = line_end(text, start);
    text[start..end]
        .char_indices()
        .nth(col)
        .map_or(end, |(idx, _)| start + idx)
}

fn line_up(text: &str, pos: usize) -> usize {
    let (line, col) = line_col(text, pos);
    if line == 0 {
        return 0;
    }
    offset_of(text, line - 1, col)
}

fn line_down(text: &str, pos: usize) -> usize {
    let (line, col) = line_col(text, pos);
    if line + 1 >= line_count(text) {
        return text.len();
    }
    offset_of(text, line + 1, col)
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn word_left(text: &str, pos: usize) -> usize {
    let start = line_start(text, pos);
    if pos == start {
        return prev_char(text, pos);
    }
    let trimmed = text[start..pos].trim_end();
    if trimmed.is_empty() {
        return start;
    }
    trimmed
        .rfind(|c: char| !is_word_char(c))
        .map_or(start, |idx| {
            let ch_len = trimmed[idx..].chars().next().map_or(1, char::len_utf8);
            start + idx + ch_len
        })
}

fn word_right(text: &str, pos: usize) -> usize {
    let end = line_end(text, pos);
    if pos >= end {
        return next_char(text, pos);
    }
    let after = &text[pos..end];
    let word_end = after
        .find(|c: char| !is_word_char(c))
        .unwrap_or(after.len());
    let rest = &after[word_end..];
    let space_end = rest.find(is_word_char).unwrap_or(rest.len());
    pos + word_end + space_end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_right_step_over_multibyte() {
        let text = "aéb";
        assert_eq!(apply(text, 1, Motion::Right), 3);
        assert_eq!(apply(text, 3, Motion::Left), 1);
        assert_eq!(apply(text, 0, Motion::Left), 0);
        assert_eq!(apply(text, 4, Motion::Right), 4);
    }

    #[test]
    fn test_line_start_and_end() {
        let text = "hello\nworld";
        assert_eq!(apply(text, 8, Motion::LineStart), 6);
        assert_eq!(apply(text, 8, Motion::LineEnd), 11);
        assert_eq!(apply(text, 2, Motion::LineEnd), 5);
    }

    #[test]
    fn test_up_down_preserve_column() {
        let text = "hello\nworld";
        assert_eq!(apply(text, 9, Motion::Up), 3);
        assert_eq!(apply(text, 3, Motion::Down), 9);
    }

    #[test]
    fn test_up_clamps_to_shorter_line() {
        let text = "hi\nhello";
        assert_eq!(apply(text, 7, Motion::Up), 2);
    }

    #[test]
    fn test_up_on_first_line_goes_to_start() {
        assert_eq!(apply("hello", 3, Motion::Up), 0);
        assert_eq!(apply("hello", 3, Motion::Down), 5);
    }

    #[test]
    fn test_word_motions() {
        let text = "foo bar_baz qux";
        assert_eq!(apply(text, 0, Motion::WordRight), 4);
        assert_eq!(apply(text, 4, Motion::WordRight), 12);
        assert_eq!(apply(text, 12, Motion::WordLeft), 4);
        assert_eq!(apply(text, 15, Motion::WordLeft), 12);
    }

    #[test]
    fn test_word_motions_treat_accented_letters_as_word_chars() {
        let text = "héllo wörld";
        assert_eq!(apply(text, 0, Motion::WordRight), 7);
        assert_eq!(apply(text, text.len(), Motion::WordLeft), 7);
    }

    #[test]
    fn test_word_left_wraps_to_previous_line() {
        let text = "hello\nworld";
        assert_eq!(apply(text, 6, Motion::WordLeft), 5);
    }

    #[test]
    fn test_line_col_and_offset_of_agree() {
        let text = "ab\ncdé\n\nx";
        for pos in [0, 2, 3, 5, 7, 8, 9, 10] {
            let (line, col) = line_col(text, pos);
            assert_eq!(offset_of(text, line, col), pos, "pos {pos}");
        }
        assert_eq!(line_count(text), 4);
        assert_eq!(line_count(""), 1);
    }

    #[test]
    fn test_offset_of_past_end_clamps() {
        assert_eq!(offset_of("ab\ncd", 9, 0), 5);
        assert_eq!(offset_of("ab\ncd", 0, 9), 2);
    }
}
