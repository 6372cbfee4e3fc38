//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position of the editor and preview panes
//! - [`style`]: Theming and colors
//! - Screen geometry shared by rendering and mouse hit-testing

pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::prompt_rect;
pub use render::{render, wrapped_row_count};

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::editor::Command;

pub const EDITOR_WIDTH_PERCENT: u16 = 50;
pub const PREVIEW_WIDTH_PERCENT: u16 = 50;

/// Columns between toolbar buttons.
const BUTTON_GAP: u16 = 0;
/// Extra columns before the first button of a new group.
const GROUP_GAP: u16 = 1;

/// Where everything goes on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub toolbar: Rect,
    pub editor: Rect,
    pub preview: Rect,
    pub toast: Option<Rect>,
    pub status: Rect,
}

impl ScreenLayout {
    /// Editor pane without its border.
    pub const fn editor_inner(&self) -> Rect {
        inner(self.editor)
    }

    /// Preview pane without its border.
    pub const fn preview_inner(&self) -> Rect {
        inner(self.preview)
    }
}

/// Split the terminal into toolbar, two panes, optional toast row and status.
pub fn screen_layout(area: Rect, toast_active: bool) -> ScreenLayout {
    let footer_rows = 1 + u16::from(toast_active);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(footer_rows),
        ])
        .split(area);
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(EDITOR_WIDTH_PERCENT),
            Constraint::Percentage(PREVIEW_WIDTH_PERCENT),
        ])
        .split(rows[1]);
    let footer = rows[2];
    let status = Rect {
        y: footer.y + footer.height.saturating_sub(1),
        height: footer.height.min(1),
        ..footer
    };
    let toast = toast_active.then_some(Rect {
        height: footer.height.saturating_sub(1),
        ..footer
    });
    ScreenLayout {
        toolbar: rows[0],
        editor: panes[0],
        preview: panes[1],
        toast,
        status,
    }
}

/// Button rectangles in toolbar order, clipped to `toolbar`.
pub fn toolbar_buttons(toolbar: Rect) -> Vec<(Command, Rect)> {
    let right = toolbar.x + toolbar.width;
    let mut x = toolbar.x;
    let mut buttons = Vec::with_capacity(Command::ALL.len());
    for command in Command::ALL {
        if starts_group(command) && x > toolbar.x {
            x += GROUP_GAP;
        }
        let width = button_width(command);
        if x + width > right {
            break;
        }
        buttons.push((command, Rect::new(x, toolbar.y, width, 1)));
        x += width + BUTTON_GAP;
    }
    buttons
}

/// The toolbar button under a mouse position.
pub fn command_at(toolbar: Rect, column: u16, row: u16) -> Option<Command> {
    toolbar_buttons(toolbar)
        .into_iter()
        .find(|(_, rect)| point_in_rect(column, row, *rect))
        .map(|(command, _)| command)
}

pub const fn point_in_rect(column: u16, row: u16, rect: Rect) -> bool {
    column >= rect.x && column < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}

/// Columns the editor text is shifted left so the caret column stays inside
/// a pane `text_width` columns wide.
pub const fn horizontal_offset(caret_col: usize, text_width: usize) -> usize {
    if text_width == 0 {
        return 0;
    }
    caret_col.saturating_sub(text_width - 1)
}

/// Width of the editor gutter: line numbers plus one space.
pub const fn gutter_width(total_lines: usize) -> u16 {
    line_number_width(total_lines) + 1
}

#[allow(clippy::cast_possible_truncation)]
const fn button_width(command: Command) -> u16 {
    // "[label]"; labels are short ASCII
    command.label().len() as u16 + 2
}

const fn starts_group(command: Command) -> bool {
    matches!(
        command,
        Command::Header | Command::ClearFormatting | Command::Save
    )
}

const fn inner(rect: Rect) -> Rect {
    Rect {
        x: rect.x.saturating_add(1),
        y: rect.y.saturating_add(1),
        width: rect.width.saturating_sub(2),
        height: rect.height.saturating_sub(2),
    }
}
