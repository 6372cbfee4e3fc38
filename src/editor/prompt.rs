use std::collections::VecDeque;

/// A blocking single-line question to the user.
///
/// Returns `None` when the user cancels.
pub trait Prompt {
    fn ask(&mut self, message: &str, default: &str) -> Option<String>;
}

impl<F> Prompt for F
where
    F: FnMut(&str, &str) -> Option<String>,
{
    fn ask(&mut self, message: &str, default: &str) -> Option<String> {
        self(message, default)
    }
}

/// Answers questions from a fixed queue, then cancels.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, message: &str, _default: &str) -> Option<String> {
        let answer = self.answers.pop_front();
        tracing::trace!(message, ?answer, "scripted prompt");
        answer
    }
}

/// Cancels every question.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl Prompt for NoPrompt {
    fn ask(&mut self, _message: &str, _default: &str) -> Option<String> {
        None
    }
}
