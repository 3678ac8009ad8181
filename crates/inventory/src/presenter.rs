//! Collaborators the store needs from whatever renders it.

use std::cell::RefCell;

use crate::draft::DraftField;

/// Presentation-layer primitives the store calls into.
pub trait Presenter {
    /// Ask the user a yes/no question. Blocks until answered.
    fn confirm(&self, prompt: &str) -> bool;

    /// Move input focus to `field` once the next render pass has finished.
    /// Fire-and-forget; it must not call back into the store.
    fn focus_after_render(&self, field: DraftField);
}

/// Non-interactive presenter: answers every confirmation with a fixed value
/// and records what it was asked.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    answer: bool,
    prompts: RefCell<Vec<String>>,
    focus_requests: RefCell<Vec<DraftField>>,
}

impl HeadlessPresenter {
    /// Confirms every prompt.
    pub fn accepting() -> Self {
        Self {
            answer: true,
            ..Self::default()
        }
    }

    /// Declines every prompt.
    pub fn declining() -> Self {
        Self::default()
    }

    pub fn set_answer(&mut self, answer: bool) {
        self.answer = answer;
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    pub fn focus_requests(&self) -> Vec<DraftField> {
        self.focus_requests.borrow().clone()
    }
}

impl Presenter for HeadlessPresenter {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.answer
    }

    fn focus_after_render(&self, field: DraftField) {
        self.focus_requests.borrow_mut().push(field);
    }
}

/// Prompt shown before a record is removed.
pub fn delete_prompt(name: &str) -> String {
    format!("Are you sure you want to remove \"{name}\"?")
}
