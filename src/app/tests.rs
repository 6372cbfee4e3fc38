use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use tempfile::tempdir;

use crate::document::MarkdownRenderer;
use crate::editor::{DRAFT_KEY, Editor, Motion, Selection};
use crate::export::MemorySink;
use crate::storage::{DraftStore, FileStore, MemoryStore};

use super::event_loop::ResizeDebouncer;
use super::{App, Message, Model, ToastLevel, update};

fn create_test_model() -> Model {
    let mut editor = Editor::default();
    editor.replace_text("# Title\n\nHello world");
    Model::new(editor, (80, 24))
}

fn create_long_test_model() -> Model {
    let mut md = String::from("# Long document\n\n");
    for i in 1..=60 {
        md.push_str(&format!("Paragraph {i} of content.\n\n"));
    }
    let mut editor = Editor::default();
    editor.replace_text(md);
    Model::new(editor, (80, 24))
}

fn model_with_store(store: MemoryStore) -> Model {
    let editor = Editor::new(
        MarkdownRenderer::new(),
        Box::new(store),
        Box::new(MemorySink::new()),
    );
    Model::new(editor, (80, 24))
}

fn failing_model() -> (tempfile::TempDir, Model) {
    let dir = tempdir().unwrap();
    // A directory cannot be written as a file.
    let store = FileStore::new(dir.path());
    let editor = Editor::new(
        MarkdownRenderer::new(),
        Box::new(store),
        Box::new(MemorySink::new()),
    );
    (dir, Model::new(editor, (80, 24)))
}

fn key(code: KeyCode, modifiers: KeyModifiers) -> event::KeyEvent {
    event::KeyEvent::new(code, modifiers)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn run(model: Model, msgs: impl IntoIterator<Item = Message>) -> Model {
    let mut model = model;
    for msg in msgs {
        App::dispatch(&mut model, msg);
    }
    model
}

#[test]
fn test_typing_inserts_and_refreshes_preview() {
    let model = Model::default();
    let model = run(
        model,
        "# Hi".chars().map(Message::Insert).collect::<Vec<_>>(),
    );
    assert_eq!(model.editor.text(), "# Hi");
    assert_eq!(model.editor.rendered_html(), "<h1>Hi</h1>\n");
    let preview: String = model.preview[0]
        .spans
        .iter()
        .map(|span| span.content.as_ref())
        .collect();
    assert!(preview.contains("Hi"));
}

#[test]
fn test_toolbar_bold_wraps_selection() {
    let mut model = create_test_model();
    model.editor.set_selection(Selection::new(9, 14));
    let model = update(model, Message::Toolbar("bold".to_string()));
    assert_eq!(model.editor.text(), "# Title\n\n**Hello** world");
}

#[test]
fn test_unknown_toolbar_id_is_ignored() {
    let model = create_test_model();
    let revision = model.editor.revision();
    let model = update(model, Message::Toolbar("strikethrough".to_string()));
    assert_eq!(model.editor.text(), "# Title\n\nHello world");
    assert_eq!(model.editor.revision(), revision);
    assert!(model.active_toast().is_none());
}

#[test]
fn test_header_prompt_flow_inserts_heading() {
    let model = Model::default();
    let model = update(model, Message::Toolbar("header".to_string()));
    let prompt = model.prompt.as_ref().unwrap();
    assert_eq!(prompt.question(), Some("Heading level (1-6):"));
    assert_eq!(prompt.input, "2");

    let model = update(model, Message::PromptBackspace);
    let model = update(model, Message::PromptInput('3'));
    let model = update(model, Message::PromptSubmit);
    assert!(model.prompt.is_none());
    assert_eq!(model.editor.text(), "### \n");
}

#[test]
fn test_header_prompt_rejects_bad_level() {
    let model = Model::default();
    let model = update(model, Message::Toolbar("header".to_string()));
    let model = update(model, Message::PromptBackspace);
    let model = update(model, Message::PromptInput('9'));
    let model = update(model, Message::PromptSubmit);
    assert_eq!(model.editor.text(), "");
    let (_, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Warning);
}

#[test]
fn test_table_prompt_asks_rows_then_columns() {
    let model = Model::default();
    let model = update(model, Message::Toolbar("table".to_string()));
    assert_eq!(model.prompt.as_ref().unwrap().question(), Some("Rows:"));

    let model = update(model, Message::PromptSubmit);
    let prompt = model.prompt.as_ref().unwrap();
    assert_eq!(prompt.question(), Some("Columns:"));
    assert_eq!(prompt.input, "2");

    let model = update(model, Message::PromptSubmit);
    assert!(model.prompt.is_none());
    assert_eq!(
        model.editor.text(),
        "\n\n| Header | Header |\n| --- | --- |\n| Content | Content |\n| Content | Content |\n| Content | Content |\n"
    );
}

#[test]
fn test_prompt_cancel_leaves_document_alone() {
    let model = create_test_model();
    let model = update(model, Message::Toolbar("table".to_string()));
    let model = update(model, Message::PromptCancel);
    assert!(model.prompt.is_none());
    assert_eq!(model.editor.text(), "# Title\n\nHello world");
}

#[test]
fn test_save_writes_draft_and_toasts() {
    let store = MemoryStore::new();
    let model = model_with_store(store.clone());
    let model = run(
        model,
        [Message::InsertText("draft text".to_string()), Message::Save],
    );
    assert_eq!(store.get(DRAFT_KEY).unwrap().as_deref(), Some("draft text"));
    assert_eq!(model.active_toast(), Some(("Draft saved", ToastLevel::Info)));
    assert!(model.editor.last_saved().is_some());
}

#[test]
fn test_save_toolbar_button_matches_ctrl_s() {
    let store = MemoryStore::new();
    let model = model_with_store(store.clone());
    let model = run(
        model,
        [
            Message::Insert('x'),
            Message::Toolbar("save".to_string()),
        ],
    );
    assert_eq!(store.get(DRAFT_KEY).unwrap().as_deref(), Some("x"));
    assert!(model.active_toast().is_some());
}

#[test]
fn test_autosave_is_silent() {
    let store = MemoryStore::new();
    let model = model_with_store(store.clone());
    let model = run(model, [Message::Insert('a'), Message::Autosave]);
    assert_eq!(store.get(DRAFT_KEY).unwrap().as_deref(), Some("a"));
    assert!(model.active_toast().is_none());
}

#[test]
fn test_failed_save_shows_error_toast() {
    let (_dir, model) = failing_model();
    let model = run(model, [Message::Save]);
    let (_, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Error);
}

#[test]
fn test_export_markdown_toasts_location() {
    let model = create_test_model();
    let model = run(model, [Message::Toolbar("export-md".to_string())]);
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Info);
    assert!(message.contains("document.md"), "{message}");
}

#[test]
fn test_quit_saves_draft() {
    let store = MemoryStore::new();
    let model = model_with_store(store.clone());
    let model = run(model, [Message::InsertText("bye".to_string()), Message::Quit]);
    assert!(model.should_quit);
    assert_eq!(store.get(DRAFT_KEY).unwrap().as_deref(), Some("bye"));
}

#[test]
fn test_quit_after_failed_save_needs_confirmation() {
    let (_dir, model) = failing_model();
    let model = run(model, [Message::Quit]);
    assert!(!model.should_quit);
    assert!(model.quit_confirmed);

    let model = run(model, [Message::Quit]);
    assert!(model.should_quit);
}

#[test]
fn test_other_message_resets_quit_confirmation() {
    let (_dir, model) = failing_model();
    let model = run(model, [Message::Quit, Message::Insert('a'), Message::Quit]);
    assert!(!model.should_quit);
}

#[test]
fn test_editor_click_places_caret() {
    let model = create_test_model();
    let model = update(model, Message::EditorClick(2, 3));
    assert_eq!(model.editor.selection(), Selection::caret(12));
    assert_eq!(model.caret_line_col(), (3, 4));
}

#[test]
fn test_editor_drag_extends_selection() {
    let model = create_test_model();
    let model = update(model, Message::EditorClick(2, 0));
    let model = update(model, Message::EditorDrag(2, 5));
    assert_eq!(model.editor.selection(), Selection::new(9, 14));
}

#[test]
fn test_caret_motion_scrolls_editor() {
    let model = create_long_test_model();
    let model = update(model, Message::Move(Motion::DocEnd, false));
    let range = model.editor_viewport.visible_range();
    let (line, _) = model.caret_line_col();
    assert!(range.contains(&(line - 1)));
    assert!(model.editor_viewport.offset() > 0);
}

#[test]
fn test_preview_page_down_scrolls() {
    let model = create_long_test_model();
    let model = update(model, Message::PreviewPageDown);
    assert_eq!(
        model.preview_viewport.offset(),
        model.preview_viewport.height() as usize
    );
    let model = update(model, Message::PreviewPageUp);
    assert_eq!(model.preview_viewport.offset(), 0);
}

#[test]
fn test_toggle_help_changes_visibility() {
    let model = Model::default();
    let model = update(model, Message::ToggleHelp);
    assert!(model.help_visible);
    let model = update(model, Message::HideHelp);
    assert!(!model.help_visible);
}

#[test]
fn test_resize_updates_viewports() {
    let model = create_long_test_model();
    let model = update(model, Message::Resize(120, 40));
    assert_eq!(model.size, (120, 40));
    // Toolbar, two border rows and the status row.
    assert_eq!(model.editor_viewport.height(), 40 - 4);
}

#[test]
fn test_key_mapping_for_editing() {
    let model = Model::default();
    assert_eq!(
        App::handle_key(key(KeyCode::Char('a'), KeyModifiers::NONE), &model),
        Some(Message::Insert('a'))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('A'), KeyModifiers::SHIFT), &model),
        Some(Message::Insert('A'))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Enter, KeyModifiers::NONE), &model),
        Some(Message::Insert('\n'))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Backspace, KeyModifiers::NONE), &model),
        Some(Message::DeleteBackward)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Left, KeyModifiers::SHIFT), &model),
        Some(Message::Move(Motion::Left, true))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Right, KeyModifiers::CONTROL), &model),
        Some(Message::Move(Motion::WordRight, false))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::End, KeyModifiers::CONTROL), &model),
        Some(Message::Move(Motion::DocEnd, false))
    );
}

#[test]
fn test_key_mapping_for_commands() {
    let model = Model::default();
    assert_eq!(
        App::handle_key(key(KeyCode::Char('b'), KeyModifiers::ALT), &model),
        Some(Message::Toolbar("bold".to_string()))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('t'), KeyModifiers::ALT), &model),
        Some(Message::Toolbar("table".to_string()))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('z'), KeyModifiers::ALT), &model),
        None
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('s'), KeyModifiers::CONTROL), &model),
        Some(Message::Save)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('q'), KeyModifiers::CONTROL), &model),
        Some(Message::Quit)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::F(1), KeyModifiers::NONE), &model),
        Some(Message::ToggleHelp)
    );
}

#[test]
fn test_key_release_is_ignored() {
    let model = Model::default();
    let mut release = key(KeyCode::Char('a'), KeyModifiers::NONE);
    release.kind = KeyEventKind::Release;
    assert_eq!(App::handle_key(release, &model), None);
}

#[test]
fn test_prompt_captures_keys() {
    let model = update(Model::default(), Message::Toolbar("header".to_string()));
    assert_eq!(
        App::handle_key(key(KeyCode::Char('4'), KeyModifiers::NONE), &model),
        Some(Message::PromptInput('4'))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Enter, KeyModifiers::NONE), &model),
        Some(Message::PromptSubmit)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Esc, KeyModifiers::NONE), &model),
        Some(Message::PromptCancel)
    );
}

#[test]
fn test_any_key_hides_help() {
    let model = update(Model::default(), Message::ToggleHelp);
    assert_eq!(
        App::handle_key(key(KeyCode::Char('x'), KeyModifiers::NONE), &model),
        Some(Message::HideHelp)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Esc, KeyModifiers::NONE), &model),
        Some(Message::HideHelp)
    );
}

#[test]
fn test_toolbar_click_dispatches_command() {
    let model = Model::default();
    let msg = App::handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 1, 0), &model);
    assert_eq!(msg, Some(Message::Toolbar("bold".to_string())));
}

#[test]
fn test_editor_click_maps_to_line_and_column() {
    let model = create_test_model();
    let inner = model.layout().editor_inner();
    // Gutter is one digit plus a space.
    let msg = App::handle_mouse(
        mouse(
            MouseEventKind::Down(MouseButton::Left),
            inner.x + 2 + 3,
            inner.y + 2,
        ),
        &model,
    );
    assert_eq!(msg, Some(Message::EditorClick(2, 3)));
}

#[test]
fn test_editor_click_counts_wide_chars_as_two_cells() {
    let mut editor = Editor::default();
    editor.replace_text("日本語abc");
    let model = Model::new(editor, (80, 24));
    let inner = model.layout().editor_inner();
    let click = |cell: u16| {
        App::handle_mouse(
            mouse(MouseEventKind::Down(MouseButton::Left), inner.x + 2 + cell, inner.y),
            &model,
        )
    };
    // Both halves of a wide char land on it.
    assert_eq!(click(0), Some(Message::EditorClick(0, 0)));
    assert_eq!(click(3), Some(Message::EditorClick(0, 1)));
    assert_eq!(click(6), Some(Message::EditorClick(0, 3)));
    assert_eq!(click(8), Some(Message::EditorClick(0, 5)));
    assert_eq!(click(30), Some(Message::EditorClick(0, 6)));
}

#[test]
fn test_wheel_scrolls_pane_under_pointer() {
    let model = create_long_test_model();
    let layout = model.layout();
    let over_preview = App::handle_mouse(
        mouse(MouseEventKind::ScrollDown, layout.preview.x + 2, layout.preview.y + 2),
        &model,
    );
    assert_eq!(over_preview, Some(Message::PreviewScrollDown(3)));
    let over_editor = App::handle_mouse(
        mouse(MouseEventKind::ScrollUp, layout.editor.x + 2, layout.editor.y + 2),
        &model,
    );
    assert_eq!(over_editor, Some(Message::EditorScrollUp(3)));
}

#[test]
fn test_paste_event_inserts_text() {
    let model = Model::default();
    let mut debouncer = ResizeDebouncer::new(100);
    let msg = App::handle_event(
        &Event::Paste("pasted".to_string()),
        &model,
        0,
        &mut debouncer,
    );
    assert_eq!(msg, Some(Message::InsertText("pasted".to_string())));
}

#[test]
fn test_resize_event_is_debounced() {
    let model = Model::default();
    let mut debouncer = ResizeDebouncer::new(100);
    let msg = App::handle_event(&Event::Resize(100, 30), &model, 0, &mut debouncer);
    assert_eq!(msg, None);
    assert!(debouncer.is_pending());
    assert_eq!(debouncer.take_ready(50), None);
    assert_eq!(debouncer.take_ready(100), Some((100, 30)));
    assert!(!debouncer.is_pending());
}

#[test]
fn test_toast_lifecycle() {
    let (_dir, model) = failing_model();
    let mut model = run(model, [Message::Save]);
    assert!(model.active_toast().is_some());
    assert!(model.layout().toast.is_some());

    assert!(!model.expire_toast(Instant::now()));
    assert!(model.expire_toast(Instant::now() + Duration::from_secs(10)));
    assert!(model.active_toast().is_none());
    assert!(model.layout().toast.is_none());
}

#[test]
fn test_full_frame_renders_after_edits() {
    let model = run(
        Model::default(),
        [Message::InsertText("# Heading\n\n- item".to_string())],
    );
    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| crate::ui::render(&model, frame))
        .unwrap();
    let buffer = terminal.backend().buffer();
    let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
    assert!(text.contains("Heading"));
    assert!(text.contains("• item"));
    assert!(text.contains("Ln 3, Col 7"));
}
