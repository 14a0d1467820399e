use crate::error::Result;
use crate::ui::Confirmer;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Confirmer for tests: hands out queued answers in order and records every
/// question asked. Once the queue is empty every further question is declined.
pub struct ScriptedConfirmer {
    answers: RefCell<VecDeque<bool>>,
    questions: RefCell<Vec<String>>,
}

impl ScriptedConfirmer {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        ScriptedConfirmer {
            answers: RefCell::new(answers.into_iter().collect()),
            questions: RefCell::new(Vec::new()),
        }
    }

    /// Questions asked so far, oldest first
    pub fn questions(&self) -> Vec<String> {
        self.questions.borrow().clone()
    }
}

impl Confirmer for ScriptedConfirmer {
    fn ask(&self, question: &str) -> Result<bool> {
        self.questions.borrow_mut().push(question.to_string());
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_in_order_then_declines() {
        let confirmer = ScriptedConfirmer::new([true, false]);
        assert!(confirmer.ask("first?").unwrap());
        assert!(!confirmer.ask("second?").unwrap());
        assert!(!confirmer.ask("third?").unwrap());
        assert_eq!(confirmer.questions(), vec!["first?", "second?", "third?"]);
    }
}
