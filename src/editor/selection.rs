/// A selection inside the document, in byte offsets.
///
/// `anchor` is where the selection started and `head` is where the caret
/// sits. The two may be in either order; [`Selection::range`] always yields
/// `(start, end)` with `start <= end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub const fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// A collapsed selection (a bare caret) at `pos`.
    pub const fn caret(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub const fn start(&self) -> usize {
        if self.anchor <= self.head {
            self.anchor
        } else {
            self.head
        }
    }

    pub const fn end(&self) -> usize {
        if self.anchor <= self.head {
            self.head
        } else {
            self.anchor
        }
    }

    pub const fn range(&self) -> (usize, usize) {
        (self.start(), self.end())
    }

    pub const fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Clamp both ends into `text` and snap them down to char boundaries.
    pub fn clamp_to(self, text: &str) -> Self {
        Self {
            anchor: floor_boundary(text, self.anchor),
            head: floor_boundary(text, self.head),
        }
    }
}

pub(crate) fn floor_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}
