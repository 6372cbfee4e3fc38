// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorError)
    clippy::module_name_repetitions
)]

//! # Markpad
//!
//! A terminal markdown editor with a live preview.
//!
//! Markpad edits a single markdown document in the terminal with:
//! - A formatting toolbar (mouse or Alt+key)
//! - A live preview, re-rendered on every edit
//! - Syntax-highlighted code blocks
//! - A persistent draft slot with scheduled autosave
//! - Export of the document as markdown or rendered HTML
//!
//! ## Architecture
//!
//! The editing core is [`editor::Editor`], which owns the document, the
//! selection and the rendered HTML, and turns toolbar commands into splices.
//! The terminal host uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`editor`]: Document, selection and toolbar commands
//! - [`document`]: Markdown to HTML and to terminal preview lines
//! - [`highlight`]: Syntax highlighting
//! - [`storage`]: Draft persistence
//! - [`export`]: Delivering exported files
//! - [`autosave`]: Scheduled draft saving
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`config`]: Persistent default flags

pub mod app;
pub mod autosave;
pub mod config;
pub mod document;
pub mod editor;
pub mod export;
pub mod highlight;
pub mod perf;
pub mod storage;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::MarkdownRenderer;
    pub use crate::editor::{Command, Editor, Outcome, Prompt, Selection};
    pub use crate::storage::{DraftStore, FileStore, MemoryStore};
}
