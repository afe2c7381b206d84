use capctl_core::error::{CapctlError, Result};
use capctl_core::question::{Answer, Question, QuestionKind};
use capctl_core::wizard::Prompter;
use dialoguer::{Confirm, Input, Select};

/// Terminal prompt frontend backed by dialoguer. Free-text questions
/// re-prompt inline on invalid input using the question's own validation
/// predicate.
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &Question) -> Result<Answer> {
        let prompt = question.message.trim_end_matches([':', ' ']).to_string();
        match &question.kind {
            QuestionKind::Input => {
                let validated = question.clone();
                let text: String = Input::new()
                    .with_prompt(prompt)
                    .allow_empty(true)
                    .validate_with(move |input: &String| validated.validate(input))
                    .interact_text()
                    .map_err(prompt_error)?;
                Ok(Answer::Text(text))
            }
            QuestionKind::Select { choices } => {
                let index = Select::new()
                    .with_prompt(prompt)
                    .items(choices)
                    .default(0)
                    .interact()
                    .map_err(prompt_error)?;
                Ok(Answer::Choice(choices[index].clone()))
            }
            QuestionKind::Confirm => {
                let confirmed = Confirm::new()
                    .with_prompt(prompt)
                    .interact()
                    .map_err(prompt_error)?;
                Ok(Answer::Confirm(confirmed))
            }
        }
    }

    fn notify(&mut self, message: &str) {
        println!("{message}");
    }
}

fn prompt_error(e: dialoguer::Error) -> CapctlError {
    CapctlError::Prompt(e.to_string())
}
