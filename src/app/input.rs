use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, Message, Model};
use crate::editor::{Command, Motion, cursor};
use crate::ui::{command_at, gutter_width, horizontal_offset, point_in_rect};

use super::event_loop::ResizeDebouncer;

/// Rows scrolled per mouse wheel notch.
const WHEEL_ROWS: usize = 3;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) if model.prompt.is_none() && !model.help_visible => {
                Some(Message::InsertText(text.clone()))
            }
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if model.prompt.is_some() {
            return match key.code {
                KeyCode::Esc => Some(Message::PromptCancel),
                KeyCode::Enter => Some(Message::PromptSubmit),
                KeyCode::Backspace => Some(Message::PromptBackspace),
                KeyCode::Char(c) if !ctrl && !alt => Some(Message::PromptInput(c)),
                _ => None,
            };
        }

        if model.help_visible {
            return match key.code {
                KeyCode::Char('q') if ctrl => Some(Message::Quit),
                KeyCode::Up | KeyCode::Char('k') => Some(Message::HelpScrollUp(1)),
                KeyCode::Down | KeyCode::Char('j') => Some(Message::HelpScrollDown(1)),
                KeyCode::PageUp => Some(Message::HelpScrollUp(10)),
                KeyCode::PageDown => Some(Message::HelpScrollDown(10)),
                _ => Some(Message::HideHelp),
            };
        }

        match key.code {
            KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char('q') if ctrl => Some(Message::Quit),
            KeyCode::Char('s') if ctrl => Some(Message::Save),
            KeyCode::Char('a') if ctrl => Some(Message::SelectAll),
            KeyCode::Char(c) if alt && !ctrl => Command::from_shortcut(c.to_ascii_lowercase())
                .map(|command| Message::Toolbar(command.id().to_string())),

            // Caret
            KeyCode::Left if ctrl => Some(Message::Move(Motion::WordLeft, shift)),
            KeyCode::Right if ctrl => Some(Message::Move(Motion::WordRight, shift)),
            KeyCode::Home if ctrl => Some(Message::Move(Motion::DocStart, shift)),
            KeyCode::End if ctrl => Some(Message::Move(Motion::DocEnd, shift)),
            KeyCode::Left => Some(Message::Move(Motion::Left, shift)),
            KeyCode::Right => Some(Message::Move(Motion::Right, shift)),
            KeyCode::Up => Some(Message::Move(Motion::Up, shift)),
            KeyCode::Down => Some(Message::Move(Motion::Down, shift)),
            KeyCode::Home => Some(Message::Move(Motion::LineStart, shift)),
            KeyCode::End => Some(Message::Move(Motion::LineEnd, shift)),

            // Preview
            KeyCode::PageUp => Some(Message::PreviewPageUp),
            KeyCode::PageDown => Some(Message::PreviewPageDown),

            // Editing
            KeyCode::Enter => Some(Message::Insert('\n')),
            KeyCode::Backspace => Some(Message::DeleteBackward),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Tab => Some(Message::InsertText("  ".to_string())),
            KeyCode::Char(c) if !ctrl => Some(Message::Insert(c)),

            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible || model.prompt.is_some() {
            return None;
        }

        let layout = model.layout();
        let editor_inner = layout.editor_inner();
        let in_editor = point_in_rect(mouse.column, mouse.row, editor_inner);
        let in_preview = point_in_rect(mouse.column, mouse.row, layout.preview);

        match mouse.kind {
            MouseEventKind::Up(MouseButton::Left)
                if point_in_rect(mouse.column, mouse.row, layout.toolbar) =>
            {
                command_at(layout.toolbar, mouse.column, mouse.row)
                    .map(|command| Message::Toolbar(command.id().to_string()))
            }
            MouseEventKind::Down(MouseButton::Left) if in_editor => {
                let (line, col) = editor_position(model, mouse.column, mouse.row);
                Some(Message::EditorClick(line, col))
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (line, col) = editor_position(model, mouse.column, mouse.row);
                Some(Message::EditorDrag(line, col))
            }
            MouseEventKind::ScrollDown if in_editor => Some(Message::EditorScrollDown(WHEEL_ROWS)),
            MouseEventKind::ScrollUp if in_editor => Some(Message::EditorScrollUp(WHEEL_ROWS)),
            MouseEventKind::ScrollDown if in_preview => {
                Some(Message::PreviewScrollDown(WHEEL_ROWS))
            }
            MouseEventKind::ScrollUp if in_preview => Some(Message::PreviewScrollUp(WHEEL_ROWS)),
            _ => None,
        }
    }
}

/// Document line and char column under a screen cell of the editor pane.
/// Cells outside the pane clamp to its edges.
fn editor_position(model: &Model, column: u16, row: u16) -> (usize, usize) {
    let inner = model.layout().editor_inner();
    let gutter = gutter_width(cursor::line_count(model.editor.text()));
    let max_row = inner.y + inner.height.saturating_sub(1);
    let row = row.clamp(inner.y, max_row.max(inner.y));
    let line = model.editor_viewport.offset() + usize::from(row - inner.y);
    let (_, caret_col) = cursor::line_col(model.editor.text(), model.editor.selection().head);
    let shift = horizontal_offset(caret_col, usize::from(inner.width.saturating_sub(gutter)));
    let cell = usize::from(column.saturating_sub(inner.x + gutter));
    let line_text = model.editor.text().split('\n').nth(line).unwrap_or("");
    (line, char_at_cell(line_text, shift, cell))
}

/// Char column drawn at `cell` when the line is shown from char `skip` on.
/// Wide chars cover two cells; past the end maps to the end of the line.
fn char_at_cell(line: &str, skip: usize, cell: usize) -> usize {
    let mut used = 0;
    let mut count = skip;
    for ch in line.chars().skip(skip) {
        let width = ch.width().unwrap_or(0);
        if cell < used + width {
            return count;
        }
        used += width;
        count += 1;
    }
    count
}
