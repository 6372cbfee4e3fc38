use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::text::Line;

use crate::editor::{Command, Editor, cursor};
use crate::ui::viewport::Viewport;
use crate::ui::{ScreenLayout, screen_layout, wrapped_row_count};

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// A command waiting on answers from the prompt overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    pub command: Command,
    /// Answers given so far, one per question.
    pub answers: Vec<String>,
    /// The line being typed for the current question.
    pub input: String,
}

impl PromptState {
    /// Start asking `command`'s questions, pre-filling the first default.
    pub fn new(command: Command) -> Self {
        let input = command
            .prompts()
            .first()
            .map(|(_, default)| (*default).to_string())
            .unwrap_or_default();
        Self {
            command,
            answers: Vec::new(),
            input,
        }
    }

    /// The current question, if any remain.
    pub fn question(&self) -> Option<&'static str> {
        self.command
            .prompts()
            .get(self.answers.len())
            .map(|(question, _)| *question)
    }

    /// Record the current input as an answer. Returns `true` when every
    /// question has been answered.
    pub fn submit(&mut self) -> bool {
        self.answers.push(std::mem::take(&mut self.input));
        match self.command.prompts().get(self.answers.len()) {
            Some((_, default)) => {
                self.input = (*default).to_string();
                false
            }
            None => true,
        }
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// The editor controller: document, selection, rendered view, draft slot
    pub editor: Editor,
    /// Styled preview lines for the current editor revision
    pub preview: Vec<Line<'static>>,
    preview_revision: u64,
    /// Scroll state of the preview pane, in wrapped rows
    pub preview_viewport: Viewport,
    /// Scroll state of the editor pane, in source lines
    pub editor_viewport: Viewport,
    /// Terminal size
    pub size: (u16, u16),
    /// Open prompt overlay
    pub prompt: Option<PromptState>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// First help line shown; clamped when rendering
    pub help_scroll: usize,
    toast: Option<Toast>,
    /// Where drafts are stored, shown in help
    pub storage_path: Option<PathBuf>,
    /// Where exports are written, shown in help
    pub export_dir: Option<PathBuf>,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Set after a failed save on quit; a second quit leaves anyway
    pub quit_confirmed: bool,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("editor", &self.editor)
            .field("size", &self.size)
            .field("prompt", &self.prompt)
            .field("help_visible", &self.help_visible)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model around `editor` for a terminal of `terminal_size`.
    pub fn new(editor: Editor, terminal_size: (u16, u16)) -> Self {
        let mut model = Self {
            editor,
            preview: Vec::new(),
            preview_revision: 0,
            preview_viewport: Viewport::default(),
            editor_viewport: Viewport::default(),
            size: terminal_size,
            prompt: None,
            help_visible: false,
            help_scroll: 0,
            toast: None,
            storage_path: None,
            export_dir: None,
            config_global_path: None,
            config_local_path: None,
            quit_confirmed: false,
            should_quit: false,
        };
        model.sync_preview();
        model.reflow_layout();
        model
    }

    /// Current screen geometry.
    pub fn layout(&self) -> ScreenLayout {
        let area = Rect::new(0, 0, self.size.0, self.size.1);
        screen_layout(area, self.toast.is_some())
    }

    /// Rebuild the terminal preview if the editor re-rendered since last time.
    pub(super) fn sync_preview(&mut self) {
        if self.preview_revision == self.editor.revision() {
            return;
        }
        let _scope = crate::perf::scope("app.sync_preview");
        self.preview = crate::document::preview_lines(self.editor.text());
        self.preview_revision = self.editor.revision();
        self.reflow_layout();
    }

    /// Recompute pane heights and content lengths after a resize or edit.
    pub(super) fn reflow_layout(&mut self) {
        let layout = self.layout();
        let editor_inner = layout.editor_inner();
        let preview_inner = layout.preview_inner();
        self.editor_viewport.resize(editor_inner.height);
        self.editor_viewport
            .set_total_rows(cursor::line_count(self.editor.text()));
        self.preview_viewport.resize(preview_inner.height);
        self.preview_viewport
            .set_total_rows(wrapped_row_count(&self.preview, preview_inner.width));
    }

    /// Scroll the editor so the caret line is on screen.
    pub(super) fn ensure_caret_visible(&mut self) {
        let (line, _) = cursor::line_col(self.editor.text(), self.editor.selection().head);
        self.editor_viewport.ensure_visible(line);
    }

    /// Caret position as 1-based line and column.
    pub fn caret_line_col(&self) -> (usize, usize) {
        let (line, col) = cursor::line_col(self.editor.text(), self.editor.selection().head);
        (line + 1, col + 1)
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        let had_toast = self.toast.is_some();
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
        if !had_toast {
            self.reflow_layout();
        }
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            self.reflow_layout();
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self::new(Editor::default(), (80, 24))
    }
}
