use super::error::ProfileError;
use crate::utils::parser::parse_assignment;
use dialoguer::{Input, theme::ColorfulTheme};
use std::collections::HashMap;
use tracing::debug;

/// Supplies the answer to a single profile question.
///
/// `key` identifies the field (and is what `--set` uses), `prompt` is the
/// human-readable question shown when asking interactively.
pub trait AnswerSource {
    fn answer(&mut self, key: &str, prompt: &str) -> Result<String, ProfileError>;
}

/// Asks the operator on the terminal. Input is echoed, passwords included.
pub struct TerminalAnswers {
    theme: ColorfulTheme,
}

impl TerminalAnswers {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalAnswers {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerSource for TerminalAnswers {
    fn answer(&mut self, key: &str, prompt: &str) -> Result<String, ProfileError> {
        debug!(key, "Prompting for profile value.");
        let value = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }
}

/// Answers taken from `KEY=VALUE` pairs given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnswers {
    values: HashMap<String, String>,
}

impl ScriptedAnswers {
    pub fn from_assignments<S: AsRef<str>>(assignments: &[S]) -> Result<Self, ProfileError> {
        let mut values = HashMap::with_capacity(assignments.len());
        for assignment in assignments {
            let (key, value) = parse_assignment(assignment.as_ref())?;
            values.insert(key.to_string(), value.to_string());
        }
        Ok(Self { values })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl AnswerSource for ScriptedAnswers {
    fn answer(&mut self, key: &str, _prompt: &str) -> Result<String, ProfileError> {
        self.values
            .remove(key)
            .ok_or_else(|| ProfileError::MissingAnswer {
                key: key.to_string(),
            })
    }
}
