//! Theming and color definitions.
//!
//! This module defines the visual styling for preview elements and the
//! editor chrome. Uses ANSI colors that adapt to the terminal's palette.

use ratatui::style::{Color, Modifier, Style};

/// A block-level element in the terminal preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Heading(u8),
    CodeBlock,
    BlockQuote,
    HorizontalRule,
    Image,
    ListMarker,
    TableBorder,
    RawHtml,
}

/// Inline formatting flags collected while walking a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub strikethrough: bool,
    pub link: bool,
    pub code: bool,
}

/// Get the style for a preview element.
pub fn style_for(element: Element) -> Style {
    let light_bg = crate::highlight::is_light_background();
    let pick = |light: Color, dark: Color| if light_bg { light } else { dark };
    match element {
        Element::Heading(1) => Style::default()
            .fg(pick(Color::Indexed(24), Color::Cyan))
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        Element::Heading(2) => Style::default()
            .fg(pick(Color::Indexed(22), Color::Green))
            .add_modifier(Modifier::BOLD),
        Element::Heading(3) => Style::default()
            .fg(pick(Color::Indexed(58), Color::Yellow))
            .add_modifier(Modifier::BOLD),
        Element::Heading(4) => Style::default()
            .fg(pick(Color::Indexed(24), Color::Blue))
            .add_modifier(Modifier::BOLD),
        Element::Heading(5) => Style::default()
            .fg(pick(Color::Indexed(54), Color::Magenta))
            .add_modifier(Modifier::BOLD),
        Element::Heading(_) => Style::default()
            .fg(pick(Color::Indexed(24), Color::Cyan))
            .add_modifier(Modifier::BOLD),
        Element::CodeBlock => Style::default()
            .fg(pick(Color::Indexed(238), Color::Indexed(245)))
            .add_modifier(Modifier::DIM),
        Element::BlockQuote => Style::default()
            .fg(pick(Color::Indexed(24), Color::Blue))
            .add_modifier(Modifier::ITALIC),
        Element::HorizontalRule | Element::TableBorder => Style::default()
            .fg(pick(Color::Indexed(241), Color::Indexed(240)))
            .add_modifier(Modifier::DIM),
        Element::Image => Style::default()
            .fg(pick(Color::Indexed(90), Color::Magenta))
            .add_modifier(Modifier::ITALIC),
        Element::ListMarker => Style::default().fg(pick(Color::Indexed(136), Color::Yellow)),
        Element::RawHtml => Style::default().add_modifier(Modifier::DIM),
    }
}

/// Merge inline formatting onto a base style.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let mut style = base;
    let light_bg = crate::highlight::is_light_background();

    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style
            .add_modifier(Modifier::UNDERLINED)
            .fg(if light_bg { Color::Blue } else { Color::LightBlue });
    }
    if inline.code {
        style = style
            .fg(if light_bg {
                Color::Indexed(88)
            } else {
                Color::Red
            })
            .add_modifier(Modifier::BOLD);
    }

    style
}

/// Style for the selected span in the editor pane.
pub fn selection_style() -> Style {
    Style::default().bg(Color::Indexed(24)).fg(Color::White)
}

/// Map a highlighter RGB color to something the terminal can show.
pub fn rgb_color(r: u8, g: u8, b: u8) -> Color {
    if supports_truecolor() {
        Color::Rgb(r, g, b)
    } else {
        Color::Indexed(rgb_to_xterm_256(r, g, b))
    }
}

fn supports_truecolor() -> bool {
    if let Ok(force) = std::env::var("MARKPAD_TRUECOLOR") {
        let value = force.to_ascii_lowercase();
        return matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    supports_truecolor_from_env(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn supports_truecolor_from_env(colorterm: Option<&str>, term: Option<&str>) -> bool {
    if let Some(ct) = colorterm {
        let lower = ct.to_ascii_lowercase();
        if lower.contains("truecolor") || lower.contains("24bit") {
            return true;
        }
    }
    if let Some(t) = term {
        let lower = t.to_ascii_lowercase();
        if lower.contains("direct") || lower.contains("truecolor") {
            return true;
        }
    }
    false
}

fn rgb_to_xterm_256(r: u8, g: u8, b: u8) -> u8 {
    // Result is always 0-5, fits in u8
    #[allow(clippy::cast_possible_truncation)]
    let to_cube = |v: u8| ((u16::from(v) * 5) / 255) as u8;
    16 + (36 * to_cube(r)) + (6 * to_cube(g)) + to_cube(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_styles_are_bold() {
        for level in 1..=6 {
            let style = style_for(Element::Heading(level));
            assert!(style.add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn test_h1_is_underlined() {
        let style = style_for(Element::Heading(1));
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_code_block_style() {
        assert!(style_for(Element::CodeBlock).fg.is_some());
    }

    #[test]
    fn test_inline_flags_stack() {
        let inline = InlineStyle {
            emphasis: true,
            strong: true,
            ..InlineStyle::default()
        };
        let style = style_for_inline(Style::default(), inline);
        assert!(style.add_modifier.contains(Modifier::ITALIC | Modifier::BOLD));
    }

    #[test]
    fn test_truecolor_detection_without_colorterm() {
        assert!(!supports_truecolor_from_env(None, Some("xterm-256color")));
    }

    #[test]
    fn test_truecolor_detection_with_colorterm() {
        assert!(supports_truecolor_from_env(
            Some("truecolor"),
            Some("xterm-256color")
        ));
    }

    #[test]
    fn test_fallback_indexed_color_when_not_truecolor() {
        assert_eq!(rgb_to_xterm_256(255, 0, 0), 196);
    }
}
