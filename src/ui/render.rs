use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::Model;
use crate::editor::cursor;

use super::style::selection_style;
use super::{
    ScreenLayout, gutter_width, horizontal_offset, overlays, screen_layout, status,
    toolbar_buttons,
};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let _scope = crate::perf::scope("ui.render");
    let area = frame.area();
    let layout = screen_layout(area, model.active_toast().is_some());

    render_toolbar(frame, &layout);
    render_editor(model, frame, &layout);
    render_preview(model, frame, &layout);

    if let Some(toast_area) = layout.toast {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, layout.status);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    } else if model.prompt.is_some() {
        overlays::render_prompt_overlay(model, frame, area);
    }
}

fn render_toolbar(frame: &mut Frame, layout: &ScreenLayout) {
    frame.render_widget(
        Paragraph::new("").style(Style::default().bg(Color::Black)),
        layout.toolbar,
    );
    let button_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let key_style = button_style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
    for (command, rect) in toolbar_buttons(layout.toolbar) {
        let label = command.label();
        let shortcut = command.shortcut();
        let key_at = label
            .char_indices()
            .find(|(_, ch)| ch.eq_ignore_ascii_case(&shortcut))
            .map(|(idx, _)| idx);
        let mut spans = vec![Span::styled("[", button_style)];
        match key_at {
            Some(idx) => {
                let end = idx + 1;
                spans.push(Span::styled(&label[..idx], button_style));
                spans.push(Span::styled(&label[idx..end], key_style));
                spans.push(Span::styled(&label[end..], button_style));
            }
            None => spans.push(Span::styled(label, button_style)),
        }
        spans.push(Span::styled("]", button_style));
        frame.render_widget(Paragraph::new(Line::from(spans)), rect);
    }
}

fn render_editor(model: &Model, frame: &mut Frame, layout: &ScreenLayout) {
    let block = Block::default().borders(Borders::ALL).title(" Markdown ");
    frame.render_widget(Clear, layout.editor);
    frame.render_widget(block, layout.editor);

    let inner = layout.editor_inner();
    let text = model.editor.text();
    let selection = model.editor.selection();
    let (sel_start, sel_end) = selection.range();
    let caret = selection.head;

    let total_lines = cursor::line_count(text);
    let gutter = gutter_width(total_lines);
    let text_width = usize::from(inner.width.saturating_sub(gutter));
    let (_, caret_col) = cursor::line_col(text, caret);
    let shift = horizontal_offset(caret_col, text_width);

    let gutter_style = Style::default().fg(Color::DarkGray);
    let caret_style = Style::default().bg(Color::White).fg(Color::Black);
    let sel_style = selection_style();

    let visible = model.editor_viewport.visible_range();
    let mut content: Vec<Line> = Vec::with_capacity(visible.len());
    let mut line_start = 0;
    for (line_idx, line_text) in text.split('\n').enumerate() {
        let line_end = line_start + line_text.len();
        if visible.contains(&line_idx) {
            let number = format!(
                "{:>width$} ",
                line_idx + 1,
                width = usize::from(gutter.saturating_sub(1))
            );
            let mut spans = vec![Span::styled(number, gutter_style)];
            let mut run = String::new();
            let mut run_style = Style::default();
            for (offset, ch) in line_text.char_indices().skip(shift) {
                let pos = line_start + offset;
                let style = if pos == caret {
                    caret_style
                } else if pos >= sel_start && pos < sel_end {
                    sel_style
                } else {
                    Style::default()
                };
                if style != run_style && !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), run_style));
                }
                run_style = style;
                run.push(ch);
            }
            if !run.is_empty() {
                spans.push(Span::styled(run, run_style));
            }
            if caret == line_end {
                spans.push(Span::styled(" ", caret_style));
            }
            content.push(Line::from(spans));
        }
        if line_idx >= visible.end {
            break;
        }
        line_start = line_end + 1;
    }

    frame.render_widget(Paragraph::new(content), inner);
}

fn render_preview(model: &Model, frame: &mut Frame, layout: &ScreenLayout) {
    let block = Block::default().borders(Borders::ALL).title(" Preview ");
    frame.render_widget(Clear, layout.preview);
    frame.render_widget(block, layout.preview);

    let inner = layout.preview_inner();
    let visible = model.preview_viewport.visible_range();
    let rows: Vec<Line> = wrap_lines(&model.preview, inner.width)
        .into_iter()
        .skip(visible.start)
        .take(visible.len())
        .collect();
    frame.render_widget(Paragraph::new(rows), inner);
}

/// Number of screen rows `lines` take when hard-wrapped at `width` columns.
pub fn wrapped_row_count(lines: &[Line<'_>], width: u16) -> usize {
    lines.iter().map(|line| wrap_points(line, width).len() + 1).sum()
}

/// Hard-wrap styled lines at `width` columns, keeping span styles.
fn wrap_lines(lines: &[Line<'static>], width: u16) -> Vec<Line<'static>> {
    let mut rows = Vec::with_capacity(lines.len());
    for line in lines {
        let breaks = wrap_points(line, width);
        if breaks.is_empty() {
            rows.push(line.clone());
            continue;
        }
        let mut breaks = breaks.into_iter().peekable();
        let mut row: Vec<Span<'static>> = Vec::new();
        let mut index = 0;
        for span in &line.spans {
            let mut piece = String::new();
            for ch in span.content.chars() {
                if breaks.peek() == Some(&index) {
                    breaks.next();
                    if !piece.is_empty() {
                        row.push(Span::styled(std::mem::take(&mut piece), span.style));
                    }
                    rows.push(Line::from(std::mem::take(&mut row)).style(line.style));
                }
                piece.push(ch);
                index += 1;
            }
            if !piece.is_empty() {
                row.push(Span::styled(piece, span.style));
            }
        }
        rows.push(Line::from(row).style(line.style));
    }
    rows
}

/// Char indices (across the whole line) where a new row starts.
fn wrap_points(line: &Line<'_>, width: u16) -> Vec<usize> {
    let width = usize::from(width);
    let mut points = Vec::new();
    if width == 0 {
        return points;
    }
    let mut column = 0;
    let chars = line.spans.iter().flat_map(|span| span.content.chars());
    for (index, ch) in chars.enumerate() {
        let ch_width = ch.width().unwrap_or(0);
        if column + ch_width > width && column > 0 {
            points.push(index);
            column = 0;
        }
        column += ch_width;
    }
    points
}
