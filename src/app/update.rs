use crate::app::model::PromptState;
use crate::app::{Model, ToastLevel};
use crate::editor::{Command, Motion, NoPrompt, Outcome, ScriptedPrompt, Selection, cursor};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Type a character
    Insert(char),
    /// Insert a run of text (paste)
    InsertText(String),
    /// Delete selection or character before caret (Backspace)
    DeleteBackward,
    /// Delete selection or character after caret (Delete)
    DeleteForward,
    /// Move the caret; `true` extends the selection
    Move(Motion, bool),
    /// Select the whole document
    SelectAll,
    /// Place the caret at a (line, column) in the editor pane
    EditorClick(usize, usize),
    /// Extend the selection to a (line, column) while dragging
    EditorDrag(usize, usize),
    /// Scroll editor pane up by n lines
    EditorScrollUp(usize),
    /// Scroll editor pane down by n lines
    EditorScrollDown(usize),

    // Toolbar
    /// Run the toolbar command with this id
    Toolbar(String),
    /// Save the draft (Ctrl+S)
    Save,
    /// Scheduled draft save
    Autosave,

    // Prompt overlay
    /// Type into the prompt
    PromptInput(char),
    /// Delete the last prompt character
    PromptBackspace,
    /// Accept the current prompt answer
    PromptSubmit,
    /// Dismiss the prompt without running the command
    PromptCancel,

    // Preview
    /// Scroll preview up by n rows
    PreviewScrollUp(usize),
    /// Scroll preview down by n rows
    PreviewScrollDown(usize),
    /// Scroll preview up one page
    PreviewPageUp,
    /// Scroll preview down one page
    PreviewPageDown,

    // Help
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Scroll help up by n lines
    HelpScrollUp(usize),
    /// Scroll help down by n lines
    HelpScrollDown(usize),

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Save the draft and quit
    Quit,
}

impl Message {
    /// The toolbar command this message runs as a side effect, if any.
    pub fn effect_command(&self) -> Option<Command> {
        match self {
            Self::Toolbar(id) => Command::from_id(id).filter(|command| command.is_effect()),
            Self::Save => Some(Command::Save),
            _ => None,
        }
    }
}

/// Pure function that updates the model based on a message.
///
/// Document edits happen here; storage and export happen in the effects
/// step that follows.
pub fn update(mut model: Model, msg: Message) -> Model {
    if !matches!(msg, Message::Quit) {
        model.quit_confirmed = false;
    }

    let revision = model.editor.revision();
    let selection = model.editor.selection();

    match msg {
        // Editing
        Message::Insert(ch) => {
            let mut buf = [0; 4];
            model.editor.insert_text(ch.encode_utf8(&mut buf));
        }
        Message::InsertText(text) => {
            model.editor.insert_text(&text.replace("\r\n", "\n"));
        }
        Message::DeleteBackward => {
            model.editor.delete_backward();
        }
        Message::DeleteForward => {
            model.editor.delete_forward();
        }
        Message::Move(motion, extend) => model.editor.move_caret(motion, extend),
        Message::SelectAll => model.editor.select_all(),
        Message::EditorClick(line, col) => {
            let pos = cursor::offset_of(model.editor.text(), line, col);
            model.editor.set_selection(Selection::caret(pos));
        }
        Message::EditorDrag(line, col) => {
            let pos = cursor::offset_of(model.editor.text(), line, col);
            let anchor = model.editor.selection().anchor;
            model.editor.set_selection(Selection::new(anchor, pos));
        }
        Message::EditorScrollUp(n) => model.editor_viewport.scroll_up(n),
        Message::EditorScrollDown(n) => model.editor_viewport.scroll_down(n),

        // Toolbar
        Message::Toolbar(id) => run_toolbar(&mut model, &id),
        // Save/Autosave: handled in effects (storage)
        Message::Save | Message::Autosave => {}

        // Prompt
        Message::PromptInput(ch) => {
            if let Some(prompt) = &mut model.prompt {
                prompt.input.push(ch);
            }
        }
        Message::PromptBackspace => {
            if let Some(prompt) = &mut model.prompt {
                prompt.input.pop();
            }
        }
        Message::PromptSubmit => submit_prompt(&mut model),
        Message::PromptCancel => {
            if let Some(prompt) = model.prompt.take() {
                tracing::debug!(command = %prompt.command, "prompt cancelled");
            }
        }

        // Preview
        Message::PreviewScrollUp(n) => model.preview_viewport.scroll_up(n),
        Message::PreviewScrollDown(n) => model.preview_viewport.scroll_down(n),
        Message::PreviewPageUp => model.preview_viewport.page_up(),
        Message::PreviewPageDown => model.preview_viewport.page_down(),

        // Help
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
            model.help_scroll = 0;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }
        Message::HelpScrollUp(n) => {
            model.help_scroll = model.help_scroll.saturating_sub(n);
        }
        Message::HelpScrollDown(n) => {
            model.help_scroll = model.help_scroll.saturating_add(n);
        }

        // Window
        Message::Resize(width, height) => {
            model.size = (width, height);
            model.reflow_layout();
        }

        // Application
        Message::Quit => {
            model.should_quit = true;
        }
    }

    if model.editor.revision() != revision {
        model.sync_preview();
        model.reflow_layout();
        model.ensure_caret_visible();
    } else if model.editor.selection() != selection {
        model.ensure_caret_visible();
    }
    model
}

/// Toolbar commands that only touch the document run here. Prompting
/// commands open the overlay; storage and export wait for effects.
fn run_toolbar(model: &mut Model, id: &str) {
    match Command::from_id(id) {
        Some(command) if command.is_effect() => return,
        Some(command) if !command.prompts().is_empty() => {
            model.prompt = Some(PromptState::new(command));
            return;
        }
        _ => {}
    }
    if let Err(err) = model.editor.dispatch(id, &mut NoPrompt) {
        model.show_toast(ToastLevel::Error, err.to_string());
    }
}

fn submit_prompt(model: &mut Model) {
    let Some(mut prompt) = model.prompt.take() else {
        return;
    };
    if !prompt.submit() {
        model.prompt = Some(prompt);
        return;
    }
    let command = prompt.command;
    let mut answers = ScriptedPrompt::new(prompt.answers);
    match model.editor.execute(command, &mut answers) {
        Ok(Outcome::Cancelled) => {
            let hint = match command {
                Command::Header => "Heading level must be a number from 1 to 6",
                Command::Table => "Rows and columns must be positive numbers",
                _ => "Nothing inserted",
            };
            model.show_toast(ToastLevel::Warning, hint);
        }
        Ok(_) => {}
        Err(err) => model.show_toast(ToastLevel::Error, err.to_string()),
    }
}
