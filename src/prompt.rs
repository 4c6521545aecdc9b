//! Interactive prompts
//!
//! The install engine never talks to the terminal directly: it asks a
//! [`Prompter`] for a yes/no answer or a pick from a list. The CLI wires in
//! [`InquirePrompter`]; tests script the answers.

use std::io::IsTerminal;

use inquire::{Confirm, Select};

use crate::error::{RelbinError, Result};

fn require_terminal(message: &str) -> Result<()> {
    if std::io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(RelbinError::PromptFailed {
            message: format!("{message}: stdin is not a terminal"),
        })
    }
}

/// Source of user decisions
pub trait Prompter {
    /// Ask a yes/no question
    fn confirm(&self, message: &str) -> Result<bool>;

    /// Ask the user to pick one of `options`, returning the chosen option
    fn select(&self, message: &str, options: &[String]) -> Result<String>;
}

/// Terminal prompts backed by `inquire`
#[derive(Debug, Default, Clone, Copy)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn confirm(&self, message: &str) -> Result<bool> {
        require_terminal(message)?;
        Confirm::new(message)
            .with_default(false)
            .with_help_message("Press 'y' to confirm, Enter or 'n' to keep the current one")
            .prompt()
            .map_err(|e| RelbinError::PromptFailed {
                message: format!("Failed to read confirmation: {e}"),
            })
    }

    fn select(&self, message: &str, options: &[String]) -> Result<String> {
        if options.is_empty() {
            return Err(RelbinError::PromptFailed {
                message: format!("{message}: nothing to choose from"),
            });
        }
        require_terminal(message)?;

        Select::new(message, options.to_vec())
            .with_page_size(10)
            .with_help_message("  ↑↓ navigate  enter select  type to filter  esc cancel")
            .prompt()
            .map_err(|e| RelbinError::PromptFailed {
                message: format!("Failed to read selection: {e}"),
            })
    }
}

#[cfg(test)]
pub mod testing {
    //! Scripted prompter for unit tests

    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::Prompter;
    use crate::error::{RelbinError, Result};

    /// A canned answer for the next prompt
    #[derive(Debug, Clone)]
    pub enum Answer {
        Confirm(bool),
        /// Pick the option whose text ends with this suffix
        Select(String),
        /// Simulate the user pressing escape
        Cancel,
    }

    /// Replays answers in order and records every question asked
    #[derive(Debug, Default)]
    pub struct ScriptedPrompter {
        answers: RefCell<VecDeque<Answer>>,
        pub asked: RefCell<Vec<String>>,
    }

    impl ScriptedPrompter {
        pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
            Self {
                answers: RefCell::new(answers.into_iter().collect()),
                asked: RefCell::new(Vec::new()),
            }
        }

        /// A prompter that fails the test if it is ever asked anything
        pub fn silent() -> Self {
            Self::default()
        }

        fn next(&self, message: &str) -> Result<Answer> {
            self.asked.borrow_mut().push(message.to_string());
            self.answers
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| RelbinError::PromptFailed {
                    message: format!("unexpected prompt: {message}"),
                })
        }
    }

    impl Prompter for ScriptedPrompter {
        fn confirm(&self, message: &str) -> Result<bool> {
            match self.next(message)? {
                Answer::Confirm(answer) => Ok(answer),
                Answer::Cancel => Err(RelbinError::PromptFailed {
                    message: "cancelled".to_string(),
                }),
                Answer::Select(_) => Err(RelbinError::PromptFailed {
                    message: format!("expected a selection answer for: {message}"),
                }),
            }
        }

        fn select(&self, message: &str, options: &[String]) -> Result<String> {
            match self.next(message)? {
                Answer::Select(suffix) => options
                    .iter()
                    .find(|option| option.ends_with(&suffix))
                    .cloned()
                    .ok_or_else(|| RelbinError::PromptFailed {
                        message: format!("no option ends with {suffix}"),
                    }),
                Answer::Cancel => Err(RelbinError::PromptFailed {
                    message: "cancelled".to_string(),
                }),
                Answer::Confirm(_) => Err(RelbinError::PromptFailed {
                    message: format!("expected a confirmation answer for: {message}"),
                }),
            }
        }
    }
}
