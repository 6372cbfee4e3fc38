//! Syntax highlighting for code blocks.
//!
//! Uses syntect for highlighting with Sublime Text syntax definitions. The
//! HTML renderer asks for inline-styled `<pre>` blocks and the terminal
//! preview asks for colored ratatui spans; both share the syntax and theme
//! sets loaded here.

use std::sync::{Mutex, OnceLock};

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

/// Highlight a code block as a standalone HTML `<pre>` element.
///
/// `language` is the fence info token. When it does not name a known syntax
/// the first line is used for detection, then plain text.
pub fn highlight_html(language: Option<&str>, code: &str) -> String {
    let syntax_set = syntax_set();
    let syntax = find_syntax(language, code).unwrap_or_else(|| syntax_set.find_syntax_plain_text());
    match syntect::html::highlighted_html_for_string(code, syntax_set, syntax, theme()) {
        Ok(html) => html,
        Err(err) => {
            tracing::warn!(%err, "code highlighting failed; emitting plain block");
            format!("<pre><code>{}</code></pre>\n", escape_html(code))
        }
    }
}

/// Highlight a code block into styled terminal lines.
pub fn highlight_code(language: Option<&str>, code: &str) -> Vec<Line<'static>> {
    let code_style = code_style();
    let Some(syntax) = find_syntax(language, code) else {
        return code
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), code_style)))
            .collect();
    };

    let syntax_set = syntax_set();
    let mode = background_mode();
    let mut highlighter = HighlightLines::new(syntax, theme());
    let mut lines = Vec::new();
    for line in code.lines() {
        let ranges = highlighter
            .highlight_line(line, syntax_set)
            .unwrap_or_default();
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .map(|(style, text)| {
                let (r, g, b) = adjust_fg_for_background(
                    (style.foreground.r, style.foreground.g, style.foreground.b),
                    mode,
                );
                Span::styled(text.to_string(), code_style.fg(crate::ui::style::rgb_color(r, g, b)))
            })
            .collect();
        lines.push(Line::from(spans));
    }
    lines
}

fn code_style() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn find_syntax(language: Option<&str>, code: &str) -> Option<&'static SyntaxReference> {
    let syntax_set = syntax_set();
    language
        .filter(|lang| !lang.is_empty())
        .and_then(|lang| {
            syntax_set
                .find_syntax_by_token(lang)
                .or_else(|| syntax_set.find_syntax_by_name(lang))
        })
        .or_else(|| {
            code.lines()
                .next()
                .and_then(|first| syntax_set.find_syntax_by_first_line(first))
        })
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(|| {
        let _scope = crate::perf::scope("highlight.syntax_set.load_defaults");
        SyntaxSet::load_defaults_newlines()
    })
}

fn theme() -> &'static Theme {
    static THEME: OnceLock<Theme> = OnceLock::new();
    THEME.get_or_init(|| {
        let _scope = crate::perf::scope("highlight.theme.load_defaults");
        let theme_set = ThemeSet::load_defaults();
        let preferred = match background_mode() {
            BackgroundMode::Dark => [
                "Monokai Extended",
                "Monokai Extended Bright",
                "Dracula",
                "Solarized (dark)",
                "base16-ocean.dark",
            ]
            .as_slice(),
            BackgroundMode::Light => [
                "InspiredGitHub",
                "Solarized (light)",
                "base16-ocean.light",
            ]
            .as_slice(),
        };

        for name in preferred {
            if let Some(theme) = theme_set.themes.get(*name) {
                return theme.clone();
            }
        }

        theme_set
            .themes
            .values()
            .next()
            .cloned()
            .unwrap_or_default()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackgroundMode {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightBackground {
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: OnceLock<Mutex<Option<HighlightBackground>>> = OnceLock::new();

pub fn set_background_mode(mode: Option<HighlightBackground>) {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(mut guard) = lock.lock() {
        *guard = mode;
    }
}

/// Whether the preview should use colors tuned for a light background.
pub fn is_light_background() -> bool {
    background_mode() == BackgroundMode::Light
}

fn background_mode() -> BackgroundMode {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(guard) = lock.lock()
        && let Some(mode) = *guard
    {
        return match mode {
            HighlightBackground::Light => BackgroundMode::Light,
            HighlightBackground::Dark => BackgroundMode::Dark,
        };
    }
    background_mode_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_mode_from_colorfgbg(colorfgbg: Option<&str>) -> BackgroundMode {
    let Some(value) = colorfgbg else {
        return BackgroundMode::Dark;
    };
    let bg_str = value.rsplit(';').next().unwrap_or(value);
    let Ok(bg) = bg_str.parse::<u8>() else {
        return BackgroundMode::Dark;
    };

    if bg >= 7 {
        BackgroundMode::Light
    } else {
        BackgroundMode::Dark
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless
)]
fn adjust_fg_for_background((r, g, b): (u8, u8, u8), mode: BackgroundMode) -> (u8, u8, u8) {
    match mode {
        BackgroundMode::Dark => (r, g, b),
        BackgroundMode::Light => {
            let luma = (0.2126 * r as f32) + (0.7152 * g as f32) + (0.0722 * b as f32);
            if luma < 155.0 {
                return (r, g, b);
            }
            let darken = |c: u8| ((c as f32) * 0.42).round() as u8;
            (darken(r), darken(g), darken(b))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_html_rust_emits_styled_pre() {
        let html = highlight_html(Some("rust"), "fn main() {}\n");
        assert!(html.starts_with("<pre"), "got {html}");
        assert!(html.contains("<span style="), "expected colored spans: {html}");
        assert!(html.contains("main"));
    }

    #[test]
    fn test_highlight_html_escapes_plain_text() {
        let html = highlight_html(Some("nope"), "a < b && c\n");
        assert!(html.contains("&lt;"));
        assert!(!html.contains("a < b"));
    }

    #[test]
    fn test_highlight_html_detects_shebang() {
        let html = highlight_html(None, "#!/bin/bash\necho hi\n");
        assert!(html.contains("echo"));
    }

    #[test]
    fn test_highlight_code_rust_produces_colored_spans() {
        let code = "fn main() {\n    let x = 1;\n}\n";
        let lines = highlight_code(Some("rust"), code);

        assert_eq!(lines.len(), 3);
        let has_color = lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .any(|span| span.style.fg.is_some());
        assert!(has_color, "Expected at least one colored span for Rust");
    }

    #[test]
    fn test_highlight_code_unknown_language_falls_back_to_plain() {
        let lines = highlight_code(Some("nope"), "just text");

        assert_eq!(lines.len(), 1);
        let has_color = lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .any(|span| span.style.fg.is_some());
        assert!(!has_color, "Unknown language should not colorize");
    }

    #[test]
    fn test_highlight_code_does_not_set_background_color() {
        let lines = highlight_code(Some("rust"), "fn main() {}");
        let has_bg = lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .any(|span| span.style.bg.is_some());
        assert!(!has_bg, "Highlighting should not override background");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_colorfgbg_dark_background() {
        assert_eq!(background_mode_from_colorfgbg(Some("15;0")), BackgroundMode::Dark);
    }

    #[test]
    fn test_colorfgbg_light_background() {
        assert_eq!(background_mode_from_colorfgbg(Some("0;15")), BackgroundMode::Light);
    }

    #[test]
    fn test_light_mode_darkens_bright_fg() {
        let bright = (240, 230, 120);
        let adjusted = adjust_fg_for_background(bright, BackgroundMode::Light);
        assert!(adjusted.0 < bright.0);
        assert!(adjusted.1 < bright.1);
        assert!(adjusted.2 < bright.2);
    }

    #[test]
    fn test_dark_mode_keeps_fg() {
        let color = (240, 230, 120);
        assert_eq!(adjust_fg_for_background(color, BackgroundMode::Dark), color);
    }
}
