//! Terminal preview: the document as styled ratatui lines.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{Arena, Options, parse_document};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::ui::style::{Element, InlineStyle, style_for, style_for_inline};

const RULE_WIDTH: usize = 40;

/// Render markdown `source` into styled lines for the preview pane.
///
/// Lines are not wrapped; the pane wraps them to its own width.
pub fn preview_lines(source: &str) -> Vec<Line<'static>> {
    let _scope = crate::perf::scope("document.preview_lines");
    let arena = Arena::new();
    let mut options = Options::default();
    super::configure_options(&mut options);
    let root = parse_document(&arena, source, &options);

    let mut out = Vec::new();
    render_blocks(root, &mut out, false);
    out
}

fn render_blocks<'a>(parent: &'a AstNode<'a>, out: &mut Vec<Line<'static>>, tight: bool) {
    for (index, child) in parent.children().enumerate() {
        if index > 0 && !tight {
            out.push(Line::default());
        }
        render_block(child, out, tight);
    }
}

fn render_block<'a>(node: &'a AstNode<'a>, out: &mut Vec<Line<'static>>, tight: bool) {
    match &node.data.borrow().value {
        NodeValue::Heading(heading) => {
            let style = style_for(Element::Heading(heading.level));
            let mut spans = vec![Span::styled(
                format!("{} ", "#".repeat(usize::from(heading.level))),
                style,
            )];
            for line in inline_lines(node, style) {
                spans.extend(line.spans);
            }
            out.push(Line::from(spans));
        }
        NodeValue::Paragraph => {
            out.extend(inline_lines(node, Style::default()));
        }
        NodeValue::CodeBlock(block) => {
            let language = block.info.split_whitespace().next();
            let border = style_for(Element::CodeBlock);
            for line in crate::highlight::highlight_code(language, &block.literal) {
                let mut spans = vec![Span::styled("  ", border)];
                spans.extend(line.spans);
                out.push(Line::from(spans));
            }
        }
        NodeValue::HtmlBlock(block) => {
            let style = style_for(Element::RawHtml);
            out.extend(
                block
                    .literal
                    .lines()
                    .map(|line| Line::styled(line.to_string(), style)),
            );
        }
        NodeValue::ThematicBreak => {
            out.push(Line::styled(
                "─".repeat(RULE_WIDTH),
                style_for(Element::HorizontalRule),
            ));
        }
        NodeValue::BlockQuote => {
            let mut inner = Vec::new();
            render_blocks(node, &mut inner, false);
            let bar_style = style_for(Element::BlockQuote);
            for line in inner {
                let mut spans = vec![Span::styled("│ ", bar_style)];
                spans.extend(
                    line.spans
                        .into_iter()
                        .map(|span| Span::styled(span.content, bar_style.patch(span.style))),
                );
                out.push(Line::from(spans));
            }
        }
        NodeValue::List(list) => {
            let list_type = list.list_type;
            let start = list.start;
            let delimiter = match list.delimiter {
                comrak::nodes::ListDelimType::Paren => ')',
                comrak::nodes::ListDelimType::Period => '.',
            };
            let tight_list = list.tight;
            for (index, item) in node.children().enumerate() {
                if index > 0 && !tight_list {
                    out.push(Line::default());
                }
                let bullet = match list_type {
                    ListType::Bullet => "•".to_string(),
                    ListType::Ordered => format!("{}{delimiter}", start + index),
                };
                let marker = match task_state(item) {
                    Some(true) => format!("{bullet} [x] "),
                    Some(false) => format!("{bullet} [ ] "),
                    None => format!("{bullet} "),
                };
                render_item(item, &marker, out, tight_list);
            }
        }
        NodeValue::Table(_) => render_table(node, out),
        NodeValue::FootnoteDefinition(def) => {
            let mut inner = Vec::new();
            render_blocks(node, &mut inner, true);
            let label = format!("[^{}]: ", def.name);
            prefix_lines(inner, &label, style_for(Element::ListMarker), out);
        }
        _ => render_blocks(node, out, tight),
    }
}

fn render_item<'a>(item: &'a AstNode<'a>, marker: &str, out: &mut Vec<Line<'static>>, tight: bool) {
    let mut inner = Vec::new();
    render_blocks(item, &mut inner, tight);
    if inner.is_empty() {
        inner.push(Line::default());
    }
    prefix_lines(inner, marker, style_for(Element::ListMarker), out);
}

/// Prefix the first line with `marker` and indent the rest to match.
fn prefix_lines(
    lines: Vec<Line<'static>>,
    marker: &str,
    marker_style: Style,
    out: &mut Vec<Line<'static>>,
) {
    let indent = " ".repeat(unicode_width::UnicodeWidthStr::width(marker));
    for (index, line) in lines.into_iter().enumerate() {
        let lead = if index == 0 {
            Span::styled(marker.to_string(), marker_style)
        } else {
            Span::raw(indent.clone())
        };
        let mut spans = vec![lead];
        spans.extend(line.spans);
        out.push(Line::from(spans));
    }
}

/// `Some(checked)` when the list item is a task item.
fn task_state<'a>(item: &'a AstNode<'a>) -> Option<bool> {
    if let NodeValue::TaskItem(symbol) = &item.data.borrow().value {
        return Some(symbol.is_some());
    }
    item.children().find_map(|child| match &child.data.borrow().value {
        NodeValue::TaskItem(symbol) => Some(symbol.is_some()),
        _ => None,
    })
}

fn render_table<'a>(table: &'a AstNode<'a>, out: &mut Vec<Line<'static>>) {
    let border = style_for(Element::TableBorder);
    for row in table.children() {
        let is_header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
        let cell_style = if is_header {
            style_for_inline(
                Style::default(),
                InlineStyle {
                    strong: true,
                    ..InlineStyle::default()
                },
            )
        } else {
            Style::default()
        };
        let mut spans = vec![Span::styled("│ ", border)];
        let mut widths = Vec::new();
        for cell in row.children() {
            let mut text_width = 0;
            for line in inline_lines(cell, cell_style) {
                for span in line.spans {
                    text_width += span.width();
                    spans.push(span);
                }
            }
            widths.push(text_width);
            spans.push(Span::styled(" │ ", border));
        }
        out.push(Line::from(spans));
        if is_header {
            let rule = widths
                .iter()
                .map(|w| "─".repeat((*w).max(3)))
                .collect::<Vec<_>>()
                .join("─┼─");
            out.push(Line::styled(format!("├─{rule}─┤"), border));
        }
    }
}

/// Collect inline content of `node`, breaking on hard line breaks.
fn inline_lines<'a>(node: &'a AstNode<'a>, base: Style) -> Vec<Line<'static>> {
    let mut lines = vec![Vec::new()];
    for child in node.children() {
        collect_inline(child, base, InlineStyle::default(), &mut lines);
    }
    lines.into_iter().map(Line::from).collect()
}

fn collect_inline<'a>(
    node: &'a AstNode<'a>,
    base: Style,
    inline: InlineStyle,
    lines: &mut Vec<Vec<Span<'static>>>,
) {
    let push = |lines: &mut Vec<Vec<Span<'static>>>, span: Span<'static>| {
        if let Some(current) = lines.last_mut() {
            current.push(span);
        }
    };
    match &node.data.borrow().value {
        NodeValue::Text(text) => {
            push(lines, Span::styled(text.clone(), style_for_inline(base, inline)));
        }
        NodeValue::Code(code) => {
            let style = style_for_inline(
                base,
                InlineStyle {
                    code: true,
                    ..InlineStyle::default()
                },
            );
            push(lines, Span::styled(code.literal.clone(), style));
        }
        NodeValue::HtmlInline(html) => {
            push(lines, Span::styled(html.clone(), style_for(Element::RawHtml)));
        }
        NodeValue::Image(image) => {
            let alt = plain_text(node);
            let label = if alt.is_empty() { &image.url } else { &alt };
            push(
                lines,
                Span::styled(format!("[Image: {label}]"), style_for(Element::Image)),
            );
        }
        NodeValue::FootnoteReference(reference) => {
            push(
                lines,
                Span::styled(format!("[^{}]", reference.name), style_for_inline(base, inline)),
            );
        }
        NodeValue::SoftBreak => {
            push(lines, Span::styled(" ", style_for_inline(base, inline)));
        }
        NodeValue::LineBreak => lines.push(Vec::new()),
        NodeValue::TaskItem(_) | NodeValue::List(_) | NodeValue::Item(_) => {}
        value => {
            let next = match value {
                NodeValue::Emph => InlineStyle {
                    emphasis: true,
                    ..inline
                },
                NodeValue::Strong => InlineStyle {
                    strong: true,
                    ..inline
                },
                NodeValue::Strikethrough => InlineStyle {
                    strikethrough: true,
                    ..inline
                },
                NodeValue::Link(_) => InlineStyle {
                    link: true,
                    ..inline
                },
                _ => inline,
            };
            for child in node.children() {
                collect_inline(child, base, next, lines);
            }
        }
    }
}

fn plain_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for child in node.descendants().skip(1) {
        match &child.data.borrow().value {
            NodeValue::Text(t) => text.push_str(t),
            NodeValue::Code(c) => text.push_str(&c.literal),
            _ => {}
        }
    }
    text
}
