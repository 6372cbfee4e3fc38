use crate::app::{App, Message, Model, ToastLevel};
use crate::editor::{Command, NoPrompt, Outcome};

impl App {
    /// Run the storage and export work a message asks for.
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        if let Some(command) = msg.effect_command() {
            Self::run_effect_command(model, command);
            return;
        }
        match msg {
            Message::Autosave => {
                if let Err(err) = model.editor.save_draft() {
                    model.show_toast(ToastLevel::Error, format!("Autosave failed: {err}"));
                    crate::perf::log_event("autosave.error", err.to_string());
                }
            }
            Message::Quit => Self::save_before_quit(model),
            _ => {}
        }
    }

    fn run_effect_command(model: &mut Model, command: Command) {
        match model.editor.dispatch(command.id(), &mut NoPrompt) {
            Ok(Outcome::Saved) => {
                model.show_toast(ToastLevel::Info, "Draft saved");
            }
            Ok(Outcome::Exported(path)) => {
                model.show_toast(ToastLevel::Info, format!("Exported to {}", path.display()));
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(%command, error = %err, "command failed");
                model.show_toast(ToastLevel::Error, err.to_string());
            }
        }
    }

    /// Leaving saves the draft. When that fails the first quit is held back
    /// so the user sees the error; a second quit leaves without saving.
    fn save_before_quit(model: &mut Model) {
        if model.quit_confirmed {
            return;
        }
        if let Err(err) = model.editor.save_draft() {
            tracing::warn!(error = %err, "draft not saved on quit");
            model.should_quit = false;
            model.quit_confirmed = true;
            model.show_toast(
                ToastLevel::Error,
                format!("{err}. Press Ctrl+Q again to quit without saving"),
            );
        }
    }
}
