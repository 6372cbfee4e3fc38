use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::editor::Command;

const PROMPT_WIDTH: u16 = 44;
const PROMPT_HEIGHT: u16 = 9;

/// Where the prompt popup sits inside `area`.
pub fn prompt_rect(area: Rect) -> Rect {
    centered_popup_rect(PROMPT_WIDTH, PROMPT_HEIGHT, area)
}

pub fn render_prompt_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(prompt) = &model.prompt else {
        return;
    };
    let popup = prompt_rect(area);
    let dim_style = Style::default().fg(Color::Indexed(245));
    let input_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let cursor_style = Style::default().bg(Color::White).fg(Color::Black);

    let step = format!(
        "{}/{}",
        prompt.answers.len() + 1,
        prompt.command.prompts().len()
    );
    let lines = vec![
        Line::from(vec![
            Span::raw(prompt.question().unwrap_or_default()),
            Span::styled(format!("  ({step})"), dim_style),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled(format!(" {}", prompt.input), input_style),
            Span::styled(" ", cursor_style),
        ]),
        Line::raw(""),
        Line::styled("Enter: OK  Esc: cancel", dim_style),
    ];

    let block = Block::default()
        .title(prompt.command.description())
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(8).max(48);
    let popup_height = area.height.saturating_sub(2).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let path_or = |path: Option<&std::path::Path>, missing: &str| {
        path.map_or_else(|| missing.to_string(), |p| p.display().to_string())
    };
    let storage = path_or(model.storage_path.as_deref(), "<memory only>");
    let exports = path_or(model.export_dir.as_deref(), "<unknown>");
    let global_cfg = path_or(model.config_global_path.as_deref(), "<unknown>");
    let local_cfg = path_or(model.config_local_path.as_deref(), "<none>");

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let mut all_lines: Vec<Line> = Vec::new();

    // Editing
    all_lines.push(Line::styled("Editing", section_style));
    all_lines.push(Line::raw("  Arrows, Home/End    Move caret (Shift selects)"));
    all_lines.push(Line::raw("  Ctrl+Left/Right     Word movement"));
    all_lines.push(Line::raw("  Ctrl+Home/End       Document start / end"));
    all_lines.push(Line::raw("  Ctrl+A              Select all"));
    all_lines.push(Line::raw("  PageUp/PageDown     Scroll preview"));
    all_lines.push(Line::raw("  Mouse               Click, drag, wheel, toolbar"));
    all_lines.push(Line::raw(""));

    // Toolbar, two shortcuts per row
    all_lines.push(Line::styled("Toolbar (Alt+key)", section_style));
    for pair in Command::ALL.chunks(2) {
        let cells: Vec<String> = pair
            .iter()
            .map(|command| format!("{}  {:<18}", command.shortcut(), command.description()))
            .collect();
        all_lines.push(Line::raw(format!("  {}", cells.join(" "))));
    }
    all_lines.push(Line::raw(""));

    // Other
    all_lines.push(Line::styled("Other", section_style));
    all_lines.push(Line::raw("  Ctrl+S              Save draft"));
    all_lines.push(Line::raw("  Ctrl+Q              Save draft and quit"));
    all_lines.push(Line::raw("  F1                  Toggle help"));
    all_lines.push(Line::raw(""));

    // Files
    all_lines.push(Line::styled("Files", section_style));
    all_lines.push(Line::raw(format!("  Draft: {storage}")));
    all_lines.push(Line::raw(format!("  Exports: {exports}")));
    all_lines.push(Line::raw(format!("  Global config: {global_cfg}")));
    all_lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height = inner.height.saturating_sub(1);
    let max_scroll = all_lines.len().saturating_sub(usize::from(content_height));
    let scroll = model.help_scroll.min(max_scroll);
    let visible: Vec<Line> = all_lines
        .into_iter()
        .skip(scroll)
        .take(usize::from(content_height))
        .collect();
    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height);
    frame.render_widget(Paragraph::new(visible), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
    let footer = Line::styled("j/k scroll \u{2502} any other key closes", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
