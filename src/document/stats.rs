/// Length-based counts shown in the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    /// Unicode scalar values in the document.
    pub chars: usize,
    /// Whitespace-separated runs.
    pub words: usize,
    pub lines: usize,
}

impl DocumentStats {
    pub fn of(text: &str) -> Self {
        Self {
            chars: text.chars().count(),
            words: text.split_whitespace().count(),
            lines: crate::editor::cursor::line_count(text),
        }
    }
}
