//! The editor controller.
//!
//! [`Editor`] owns the document string, the selection, and the rendered HTML
//! derived from the document. Toolbar commands become splices at the
//! selection; every mutation re-renders the whole document. Drafts go to a
//! [`DraftStore`] and exports to a [`DownloadSink`], both injected.

mod command;
pub mod cursor;
mod prompt;
mod selection;
pub mod splice;

pub use command::{Command, HEADER_PROMPTS, TABLE_PROMPTS};
pub use cursor::Motion;
pub use prompt::{NoPrompt, Prompt, ScriptedPrompt};
pub use selection::Selection;

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::document::{DocumentStats, MarkdownRenderer};
use crate::export::{DownloadSink, ExportError, ExportFormat, MemorySink};
use crate::storage::{DraftStore, MemoryStore, StorageError};
use splice::Splice;

/// Storage key of the draft slot.
pub const DRAFT_KEY: &str = "editorDraft";

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("saving draft failed: {0}")]
    Storage(#[from] StorageError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The document changed.
    Edited,
    /// The draft was written.
    Saved,
    /// A file was delivered to this location.
    Exported(PathBuf),
    /// Unknown command id; nothing happened.
    Ignored,
    /// A prompt was cancelled or answered with something unusable.
    Cancelled,
}

pub struct Editor {
    text: String,
    selection: Selection,
    rendered: String,
    stats: DocumentStats,
    revision: u64,
    last_saved: Option<DateTime<Local>>,
    renderer: MarkdownRenderer,
    store: Box<dyn DraftStore>,
    sink: Box<dyn DownloadSink>,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("text_len", &self.text.len())
            .field("selection", &self.selection)
            .field("revision", &self.revision)
            .field("last_saved", &self.last_saved)
            .finish_non_exhaustive()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(
            MarkdownRenderer::new(),
            Box::new(MemoryStore::new()),
            Box::new(MemorySink::new()),
        )
    }
}

impl Editor {
    /// An editor with an empty document.
    pub fn new(
        renderer: MarkdownRenderer,
        store: Box<dyn DraftStore>,
        sink: Box<dyn DownloadSink>,
    ) -> Self {
        let mut editor = Self {
            text: String::new(),
            selection: Selection::default(),
            rendered: String::new(),
            stats: DocumentStats::default(),
            revision: 0,
            last_saved: None,
            renderer,
            store,
            sink,
        };
        editor.update_preview();
        editor
    }

    /// An editor restored from the draft slot, if one was saved.
    pub fn open(
        renderer: MarkdownRenderer,
        store: Box<dyn DraftStore>,
        sink: Box<dyn DownloadSink>,
    ) -> Self {
        let mut editor = Self::new(renderer, store, sink);
        editor.load_draft();
        editor
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// The Rendered View: HTML for the current document.
    pub fn rendered_html(&self) -> &str {
        &self.rendered
    }

    pub const fn stats(&self) -> DocumentStats {
        self.stats
    }

    /// Bumped every time the rendered view is regenerated.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub const fn last_saved(&self) -> Option<DateTime<Local>> {
        self.last_saved
    }

    /// `Last saved: HH:MM:SS`, once a save has happened this session.
    pub fn last_saved_label(&self) -> Option<String> {
        self.last_saved
            .map(|at| format!("Last saved: {}", at.format("%H:%M:%S")))
    }

    /// Move the selection. Out-of-range offsets are clamped.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp_to(&self.text);
    }

    /// Re-render the document and refresh the statistics.
    pub fn update_preview(&mut self) {
        self.rendered = self.renderer.render(&self.text);
        self.stats = DocumentStats::of(&self.text);
        self.revision += 1;
        crate::perf::log_event(
            "editor.update_preview",
            format!("rev={} bytes={}", self.revision, self.text.len()),
        );
    }

    /// Run the toolbar command named `id`. Unknown ids do nothing.
    pub fn dispatch(
        &mut self,
        id: &str,
        prompt: &mut dyn Prompt,
    ) -> Result<Outcome, EditorError> {
        let Some(command) = Command::from_id(id) else {
            tracing::debug!(id, "ignoring unknown toolbar command");
            return Ok(Outcome::Ignored);
        };
        self.execute(command, prompt)
    }

    pub fn execute(
        &mut self,
        command: Command,
        prompt: &mut dyn Prompt,
    ) -> Result<Outcome, EditorError> {
        tracing::debug!(%command, selection = ?self.selection, "dispatch");
        crate::perf::log_event("editor.dispatch", command.id());
        match command {
            Command::Bold => self.wrap_text("**", "**"),
            Command::Italic => self.wrap_text("_", "_"),
            Command::Link => self.wrap_text("[", "](https://)"),
            Command::Image => self.wrap_text("[", "](image.jpg)"),
            Command::Code => self.wrap_text("\n```\n", "\n```\n"),
            Command::Header => return Ok(self.insert_header(prompt)),
            Command::UnorderedList => self.wrap_selection("- ", ""),
            Command::OrderedList => self.wrap_selection("1. ", ""),
            Command::Quote => self.wrap_text("\n> ", "\n"),
            Command::HorizontalRule => self.insert_at_cursor("\n---\n"),
            Command::Table => return Ok(self.insert_table(prompt)),
            Command::Checklist => self.wrap_selection("- [ ] ", ""),
            Command::ClearFormatting => self.clear_formatting(),
            Command::Save => {
                self.save_draft()?;
                return Ok(Outcome::Saved);
            }
            Command::ExportHtml => return self.export(ExportFormat::Html).map(Outcome::Exported),
            Command::ExportMarkdown => {
                return self.export(ExportFormat::Markdown).map(Outcome::Exported);
            }
        }
        Ok(Outcome::Edited)
    }

    /// Surround the selection with `before` and `after`.
    pub fn wrap_text(&mut self, before: &str, after: &str) {
        let splice = splice::wrap_text(&self.text, self.selection, before, after);
        self.apply(splice);
    }

    /// Prefix and suffix every selected line.
    pub fn wrap_selection(&mut self, before: &str, after: &str) {
        let splice = splice::wrap_lines(&self.text, self.selection, before, after);
        self.apply(splice);
    }

    /// Replace the selection with `text`, leaving the caret after it.
    pub fn insert_at_cursor(&mut self, text: &str) {
        let splice = splice::insert_at(&self.text, self.selection, text);
        self.apply(splice);
    }

    /// Strip bold and italic markers inside the selection.
    pub fn clear_formatting(&mut self) {
        let splice = splice::clear_formatting(&self.text, self.selection);
        self.apply(splice);
    }

    /// Ask for a heading level and wrap the selection as that heading.
    pub fn insert_header(&mut self, prompt: &mut dyn Prompt) -> Outcome {
        let [(question, default)] = HEADER_PROMPTS;
        let Some(level) = prompt
            .ask(question, default)
            .as_deref()
            .and_then(splice::parse_heading_level)
        else {
            return Outcome::Cancelled;
        };
        self.wrap_text(&splice::heading_prefix(level), "\n");
        Outcome::Edited
    }

    /// Ask for a row and column count and insert an empty table.
    pub fn insert_table(&mut self, prompt: &mut dyn Prompt) -> Outcome {
        let [(rows_q, rows_default), (cols_q, cols_default)] = TABLE_PROMPTS;
        let Some(rows) = prompt
            .ask(rows_q, rows_default)
            .as_deref()
            .and_then(splice::parse_dimension)
        else {
            return Outcome::Cancelled;
        };
        let Some(cols) = prompt
            .ask(cols_q, cols_default)
            .as_deref()
            .and_then(splice::parse_dimension)
        else {
            return Outcome::Cancelled;
        };
        self.insert_at_cursor(&splice::table_skeleton(rows, cols));
        Outcome::Edited
    }

    /// Write the document to the draft slot.
    pub fn save_draft(&mut self) -> Result<(), EditorError> {
        self.store.set(DRAFT_KEY, &self.text)?;
        let now = Local::now();
        self.last_saved = Some(now);
        tracing::info!(bytes = self.text.len(), at = %now.format("%H:%M:%S"), "draft saved");
        Ok(())
    }

    /// Replace the document with the saved draft, if there is a non-empty one.
    ///
    /// Returns whether a draft was restored. Read failures count as no draft.
    pub fn load_draft(&mut self) -> bool {
        let draft = match self.store.get(DRAFT_KEY) {
            Ok(draft) => draft,
            Err(err) => {
                tracing::warn!(%err, "could not read draft; starting empty");
                None
            }
        };
        match draft {
            Some(text) if !text.is_empty() => {
                tracing::info!(bytes = text.len(), "draft restored");
                self.text = text;
                self.selection = Selection::caret(0);
                self.update_preview();
                true
            }
            _ => false,
        }
    }

    /// Deliver the document (Markdown) or the rendered view (HTML).
    pub fn export(&mut self, format: ExportFormat) -> Result<PathBuf, EditorError> {
        let payload = match format {
            ExportFormat::Html => self.rendered.as_bytes(),
            ExportFormat::Markdown => self.text.as_bytes(),
        };
        let path = self
            .sink
            .deliver(payload, format.mime_type(), format.file_name())?;
        Ok(path)
    }

    /// Typed text replaces the selection.
    pub fn insert_text(&mut self, text: &str) {
        self.insert_at_cursor(text);
    }

    /// Backspace: delete the selection, or the char before the caret.
    pub fn delete_backward(&mut self) -> bool {
        let (start, end) = self.selection.range();
        let from = if start == end {
            cursor::prev_char(&self.text, start)
        } else {
            start
        };
        self.delete_range(from, end)
    }

    /// Delete: delete the selection, or the char after the caret.
    pub fn delete_forward(&mut self) -> bool {
        let (start, end) = self.selection.range();
        let to = if start == end {
            cursor::next_char(&self.text, end)
        } else {
            end
        };
        self.delete_range(start, to)
    }

    pub fn select_all(&mut self) {
        self.selection = Selection::new(0, self.text.len());
    }

    /// Replace the whole document, caret at the start.
    pub fn replace_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.selection = Selection::caret(0);
        self.update_preview();
    }

    /// Move the caret. With `extend` the anchor stays put.
    pub fn move_caret(&mut self, motion: Motion, extend: bool) {
        let Selection { anchor, head } = self.selection;
        if !extend && !self.selection.is_empty() {
            match motion {
                Motion::Left => {
                    self.selection = Selection::caret(self.selection.start());
                    return;
                }
                Motion::Right => {
                    self.selection = Selection::caret(self.selection.end());
                    return;
                }
                _ => {}
            }
        }
        let head = cursor::apply(&self.text, head, motion);
        self.selection = if extend {
            Selection::new(anchor, head)
        } else {
            Selection::caret(head)
        };
    }

    fn delete_range(&mut self, start: usize, end: usize) -> bool {
        if start == end {
            return false;
        }
        self.text.replace_range(start..end, "");
        self.selection = Selection::caret(start);
        self.update_preview();
        true
    }

    fn apply(&mut self, splice: Splice) {
        self.text = splice.text;
        self.selection = splice.selection.clamp_to(&self.text);
        self.update_preview();
    }
}
