use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use snapkeep::{Confirmation, ConfirmationPrompt};

/// Answers confirmation prompts from a pre-recorded script and keeps the
/// messages it was asked, so tests can assert on both.
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Confirmation>>,
    messages: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: impl IntoIterator<Item = Confirmation>) -> Self {
        ScriptedPrompt {
            answers: Mutex::new(answers.into_iter().collect()),
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn prompt_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait]
impl ConfirmationPrompt for ScriptedPrompt {
    async fn confirm(&self, message: &str) -> Confirmation {
        self.messages.lock().unwrap().push(message.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Confirmation::No)
    }
}
