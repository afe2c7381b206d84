//! Interactive capability authoring as an explicit state machine.
//!
//! Each state asks exactly one question; the transition function consumes
//! the answer, mutates the in-progress definition, and produces the next
//! question. The machine never performs I/O itself: a [`Prompter`] renders
//! questions, and the driver loop feeds answers back in.

use crate::answers::AnswerStore;
use crate::capability::{
    setter_command_name, Argument, Attribute, CapabilityDefinition, Command, EnumCommand,
    ValueSchema, ValueType,
};
use crate::error::{CapctlError, Result};
use crate::question::{
    Answer, Question, Validator, ACTION_ADD_ATTRIBUTE, ACTION_ADD_COMMAND, ACTION_FINISH,
};
use crate::validate::validate;
use serde_json::{Number, Value};
use std::str::FromStr;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    CapabilityName,
    Action,
    AttributeName,
    ValueType { for_attribute: bool },
    MinValue,
    MaxValue,
    MaxLength,
    SetterPrompt,
    BasicCommands,
    CommandName { basic: bool },
    CommandValue,
    CommandArgument,
    ArgumentName,
    OptionalArgument,
}

// ---------------------------------------------------------------------------
// StepOutcome
// ---------------------------------------------------------------------------

/// Result of applying one answer to the wizard.
#[derive(Debug)]
pub enum StepOutcome {
    /// Ask the next question, optionally after showing a progress notice.
    Ask {
        notice: Option<&'static str>,
        question: Question,
    },
    /// The answer (or finish-time validation) was rejected; re-ask the same
    /// step without losing any collected state.
    Invalid { message: String, question: Question },
    /// The wizard is complete; submit the assembled definition.
    Finished(CapabilityDefinition),
}

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

/// The capability authoring state machine.
///
/// Owns the in-progress definition plus the transient argument and enum
/// command lists, which are drained into the definition at each commit
/// point and must never retain entries across commits.
pub struct Wizard {
    state: State,
    answers: AnswerStore,
    capability: CapabilityDefinition,
    command_arguments: Vec<Argument>,
    enum_commands: Vec<EnumCommand>,
}

impl Wizard {
    /// A fresh wizard positioned on the capability name question.
    pub fn start() -> (Self, Question) {
        let wizard = Self {
            state: State::CapabilityName,
            answers: AnswerStore::default(),
            capability: CapabilityDefinition::new(""),
            command_arguments: Vec::new(),
            enum_commands: Vec::new(),
        };
        let question = capability_name_question();
        (wizard, question)
    }

    /// Apply one answer to the current state. This is the transition
    /// function: it validates the answer, performs any commit side effects,
    /// and moves to the next state.
    pub fn apply(&mut self, answer: Answer) -> Result<StepOutcome> {
        match self.state {
            State::CapabilityName => {
                let input = self.text(answer)?;
                if let Err(message) = capability_name_question().validate(&input) {
                    return self.invalid(message);
                }
                self.capability.name = input;
                self.goto(State::Action)
            }

            State::Action => {
                let choice = self.choice(answer)?;
                match choice.as_str() {
                    ACTION_ADD_ATTRIBUTE => self.goto(State::AttributeName),
                    ACTION_ADD_COMMAND => self.goto(State::CommandName { basic: false }),
                    ACTION_FINISH => {
                        let outcome = validate(&self.capability);
                        if outcome.is_ok() {
                            Ok(StepOutcome::Finished(self.capability.clone()))
                        } else {
                            self.invalid(format!(
                                "Validation failed: {}",
                                outcome.reason.unwrap_or_default()
                            ))
                        }
                    }
                    other => self.invalid(format!("unknown action: {other}")),
                }
            }

            State::AttributeName => {
                let input = self.validated_text(answer)?;
                match input {
                    Err(outcome) => Ok(outcome),
                    Ok(name) => {
                        self.answers.attribute_name = Some(name);
                        self.goto(State::ValueType {
                            for_attribute: true,
                        })
                    }
                }
            }

            State::ValueType { for_attribute } => {
                let choice = self.choice(answer)?;
                let value_type = ValueType::from_str(&choice)?;
                if for_attribute {
                    self.answers.attribute_type = Some(value_type);
                    match value_type {
                        ValueType::Integer | ValueType::Number => self.goto(State::MinValue),
                        ValueType::String => self.goto(State::MaxLength),
                        ValueType::Boolean => self.goto(State::SetterPrompt),
                    }
                } else {
                    self.answers.argument_type = Some(value_type);
                    self.goto(State::OptionalArgument)
                }
            }

            State::MinValue => {
                let input = self.validated_text(answer)?;
                match input {
                    Err(outcome) => Ok(outcome),
                    Ok(input) => {
                        if !input.is_empty() {
                            self.answers.schema_min_value = Some(self.parse_bound(&input)?);
                        }
                        self.goto(State::MaxValue)
                    }
                }
            }

            State::MaxValue => {
                let input = self.validated_text(answer)?;
                match input {
                    Err(outcome) => Ok(outcome),
                    Ok(input) => {
                        if !input.is_empty() {
                            self.answers.schema_max_value = Some(self.parse_bound(&input)?);
                        }
                        self.goto(State::SetterPrompt)
                    }
                }
            }

            State::MaxLength => {
                let input = self.validated_text(answer)?;
                match input {
                    Err(outcome) => Ok(outcome),
                    Ok(input) => {
                        if !input.is_empty() {
                            self.answers.schema_max_length = Some(parse_length(&input)?);
                        }
                        self.goto(State::SetterPrompt)
                    }
                }
            }

            State::SetterPrompt => {
                let add_setter = self.confirm(answer)?;
                self.answers.attribute_setter = Some(add_setter);
                self.goto(State::BasicCommands)
            }

            State::BasicCommands => {
                if self.confirm(answer)? {
                    self.goto(State::CommandName { basic: true })
                } else {
                    self.commit_attribute()
                }
            }

            State::CommandName { basic } => {
                let input = self.validated_text(answer)?;
                match input {
                    Err(outcome) => Ok(outcome),
                    Ok(name) => {
                        self.answers.command_name = Some(name);
                        if basic {
                            self.goto(State::CommandValue)
                        } else {
                            self.goto(State::CommandArgument)
                        }
                    }
                }
            }

            State::CommandValue => self.apply_command_value(answer),

            State::CommandArgument => {
                if self.confirm(answer)? {
                    self.goto(State::ArgumentName)
                } else {
                    self.insert_command()?;
                    self.goto_with(Some("Command added!"), State::Action)
                }
            }

            State::ArgumentName => {
                let input = self.validated_text(answer)?;
                match input {
                    Err(outcome) => Ok(outcome),
                    Ok(name) => {
                        self.answers.argument_name = Some(name);
                        self.goto(State::ValueType {
                            for_attribute: false,
                        })
                    }
                }
            }

            State::OptionalArgument => {
                self.answers.argument_optional = Some(self.confirm(answer)?);
                self.push_argument(false)?;
                self.goto_with(Some("Argument added!"), State::CommandArgument)
            }
        }
    }

    // -- questions ----------------------------------------------------------

    /// Question for the current state.
    fn question(&self) -> Result<Question> {
        Ok(match self.state {
            State::CapabilityName => capability_name_question(),
            State::Action => Question::select(
                "Select an action...",
                vec![
                    ACTION_ADD_ATTRIBUTE.to_string(),
                    ACTION_ADD_COMMAND.to_string(),
                    ACTION_FINISH.to_string(),
                ],
            ),
            State::AttributeName => Question::input(
                "Attribute Name: ",
                Validator::NonEmpty {
                    error: "Invalid attribute name",
                },
            ),
            State::ValueType { for_attribute } => {
                let noun = if for_attribute { "attribute" } else { "argument" };
                Question::select(
                    format!("Select an {noun} type..."),
                    ValueType::all()
                        .iter()
                        .map(|t| t.as_str().to_string())
                        .collect(),
                )
            }
            State::MinValue => Question::input(
                "Minimum value (default: no minimum): ",
                Validator::OptionalNumeric,
            ),
            State::MaxValue => Question::input(
                "Maximum value (default: no maximum): ",
                Validator::OptionalNumeric,
            ),
            State::MaxLength => Question::input(
                "Maximum length (default: no max length): ",
                Validator::OptionalNumeric,
            ),
            State::SetterPrompt => Question::confirm("Add a setter command?"),
            State::BasicCommands => Question::confirm(if self.enum_commands.is_empty() {
                "Include basic commands?"
            } else {
                "Add another basic command?"
            }),
            State::CommandName { .. } => Question::input(
                "Command Name: ",
                Validator::NonEmpty {
                    error: "Invalid command name",
                },
            ),
            State::CommandValue => self.command_value_question()?,
            State::CommandArgument => Question::confirm(if self.command_arguments.is_empty() {
                "Add an argument?"
            } else {
                "Add another argument?"
            }),
            State::ArgumentName => Question::input(
                "Argument Name: ",
                Validator::NonEmpty {
                    error: "Argument name is a required field",
                },
            ),
            State::OptionalArgument => Question::confirm("Is this argument optional?"),
        })
    }

    /// The command value prompt is keyed on the owning attribute's type:
    /// numeric input checked against the recorded bounds, string input
    /// against the recorded max length, boolean as a two-choice list.
    fn command_value_question(&self) -> Result<Question> {
        let value_type = self.attribute_type()?;
        Ok(match value_type {
            ValueType::Integer | ValueType::Number => Question::input(
                "Command Value: ",
                Validator::NumberInRange {
                    minimum: self.answers.schema_min_value.as_ref().and_then(Number::as_f64),
                    maximum: self.answers.schema_max_value.as_ref().and_then(Number::as_f64),
                },
            ),
            ValueType::String => Question::input(
                "Command Value: ",
                Validator::TextMaxLength {
                    max_length: self.answers.schema_max_length,
                },
            ),
            ValueType::Boolean => Question::select(
                "Command Value: ",
                vec!["True".to_string(), "False".to_string()],
            ),
        })
    }

    // -- transitions with side effects --------------------------------------

    fn apply_command_value(&mut self, answer: Answer) -> Result<StepOutcome> {
        let value_type = self.attribute_type()?;
        let value = match value_type {
            ValueType::Integer | ValueType::Number => {
                let input = self.text(answer)?;
                if let Err(message) = self.command_value_question()?.validate(&input) {
                    return self.invalid(message);
                }
                Value::Number(self.parse_bound(&input)?)
            }
            ValueType::String => {
                let input = self.text(answer)?;
                if let Err(message) = self.command_value_question()?.validate(&input) {
                    return self.invalid(message);
                }
                Value::String(input)
            }
            ValueType::Boolean => Value::Bool(self.choice(answer)? == "True"),
        };
        self.answers.basic_command_value = Some(value.clone());

        let command = self.command_name()?;
        self.enum_commands.push(EnumCommand { command, value });
        // A basic command never carries arguments; the list is drained empty.
        self.insert_command()?;
        self.goto_with(Some("Command added!"), State::BasicCommands)
    }

    /// Assemble the attribute from the collected answers and insert it into
    /// the definition, committing the setter command first when requested.
    fn commit_attribute(&mut self) -> Result<StepOutcome> {
        let name = self
            .answers
            .attribute_name
            .clone()
            .ok_or_else(|| unreachable("attribute commit without an attribute name"))?;
        let value_type = self.attribute_type()?;

        let mut value = ValueSchema::new(value_type);
        if value_type.is_numeric() {
            value.minimum = self.answers.schema_min_value.clone();
            value.maximum = self.answers.schema_max_value.clone();
        }
        if value_type == ValueType::String {
            value.max_length = self.answers.schema_max_length;
        }
        let mut attribute = Attribute::new(value);

        if self.answers.attribute_setter == Some(true) {
            let setter = setter_command_name(&name);
            self.answers.command_name = Some(setter.clone());
            attribute.setter = Some(setter);
            self.answers.argument_name = Some("value".to_string());
            self.answers.argument_type = Some(value_type);
            self.push_argument(true)?;
        }

        if !self.enum_commands.is_empty() {
            attribute.enum_commands = Some(std::mem::take(&mut self.enum_commands));
        }

        self.capability.attributes.insert(name, attribute);
        self.answers.reset_schema_constraints();
        self.goto_with(Some("Attribute added!"), State::Action)
    }

    /// Build an argument from the collected answers and push it onto the
    /// pending list. A setter argument mirrors the attribute's recorded
    /// constraints and commits the owning command immediately; a regular
    /// argument waits for the next add-another-argument answer.
    fn push_argument(&mut self, setter_argument: bool) -> Result<()> {
        let name = self
            .answers
            .argument_name
            .clone()
            .ok_or_else(|| unreachable("argument commit without an argument name"))?;
        let value_type = self
            .answers
            .argument_type
            .ok_or_else(|| unreachable("argument commit without an argument type"))?;

        let mut schema = ValueSchema::new(value_type);
        if setter_argument {
            schema.minimum = self.answers.schema_min_value.clone();
            schema.maximum = self.answers.schema_max_value.clone();
            schema.max_length = self.answers.schema_max_length;
            self.command_arguments.push(Argument {
                name,
                optional: false,
                schema,
            });
            self.insert_command()
        } else {
            self.command_arguments.push(Argument {
                name,
                optional: self.answers.argument_optional.unwrap_or(false),
                schema,
            });
            Ok(())
        }
    }

    /// Insert the pending command into the definition, draining the
    /// argument list.
    fn insert_command(&mut self) -> Result<()> {
        let name = self.command_name()?;
        let arguments = std::mem::take(&mut self.command_arguments);
        self.capability.commands.insert(
            name.clone(),
            Command { name, arguments },
        );
        Ok(())
    }

    // -- helpers -------------------------------------------------------------

    fn goto(&mut self, state: State) -> Result<StepOutcome> {
        self.goto_with(None, state)
    }

    fn goto_with(&mut self, notice: Option<&'static str>, state: State) -> Result<StepOutcome> {
        self.state = state;
        Ok(StepOutcome::Ask {
            notice,
            question: self.question()?,
        })
    }

    fn invalid(&self, message: impl Into<String>) -> Result<StepOutcome> {
        Ok(StepOutcome::Invalid {
            message: message.into(),
            question: self.question()?,
        })
    }

    /// Extract free text, or validate it against the current question and
    /// produce an [`StepOutcome::Invalid`] re-ask.
    fn validated_text(&self, answer: Answer) -> Result<std::result::Result<String, StepOutcome>> {
        let input = self.text(answer)?;
        match self.question()?.validate(&input) {
            Ok(()) => Ok(Ok(input)),
            Err(message) => Ok(Err(StepOutcome::Invalid {
                message,
                question: self.question()?,
            })),
        }
    }

    fn text(&self, answer: Answer) -> Result<String> {
        match answer {
            Answer::Text(text) => Ok(text),
            other => Err(unreachable(&format!(
                "expected free text in state {:?}, got {other:?}",
                self.state
            ))),
        }
    }

    fn choice(&self, answer: Answer) -> Result<String> {
        match answer {
            Answer::Choice(choice) => Ok(choice),
            other => Err(unreachable(&format!(
                "expected a list choice in state {:?}, got {other:?}",
                self.state
            ))),
        }
    }

    fn confirm(&self, answer: Answer) -> Result<bool> {
        match answer {
            Answer::Confirm(confirmed) => Ok(confirmed),
            other => Err(unreachable(&format!(
                "expected a confirmation in state {:?}, got {other:?}",
                self.state
            ))),
        }
    }

    fn attribute_type(&self) -> Result<ValueType> {
        self.answers
            .attribute_type
            .ok_or_else(|| unreachable("attribute type not yet recorded"))
    }

    fn command_name(&self) -> Result<String> {
        self.answers
            .command_name
            .clone()
            .ok_or_else(|| unreachable("command commit without a command name"))
    }

    /// Parse a numeric bound or command value with the attribute's type:
    /// integers truncate, numbers keep their fraction.
    fn parse_bound(&self, input: &str) -> Result<Number> {
        let parsed: f64 = input
            .parse()
            .map_err(|_| CapctlError::InvalidAnswer(format!("not a number: {input}")))?;
        match self.attribute_type()? {
            ValueType::Integer => Ok(Number::from(parsed.trunc() as i64)),
            _ => Number::from_f64(parsed)
                .ok_or_else(|| CapctlError::InvalidAnswer(format!("not a finite number: {input}"))),
        }
    }
}

fn parse_length(input: &str) -> Result<u64> {
    let parsed: f64 = input
        .parse()
        .map_err(|_| CapctlError::InvalidAnswer(format!("not a number: {input}")))?;
    Ok(parsed.trunc().max(0.0) as u64)
}

fn capability_name_question() -> Question {
    Question::input("Capability Name: ", Validator::CapabilityName)
}

fn unreachable(detail: &str) -> CapctlError {
    CapctlError::UnreachableState(detail.to_string())
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Prompt frontend: renders one question at a time and reports progress
/// notices. Implementations re-prompt on invalid free-text input using
/// [`Question::validate`]; the state machine re-checks regardless and
/// re-asks through [`StepOutcome::Invalid`].
pub trait Prompter {
    fn ask(&mut self, question: &Question) -> Result<Answer>;
    fn notify(&mut self, message: &str);
}

/// Drive the wizard against a prompt frontend until the definition is
/// complete. One question is outstanding at a time.
pub fn run_wizard<P: Prompter>(prompter: &mut P) -> Result<CapabilityDefinition> {
    let (mut wizard, mut question) = Wizard::start();
    loop {
        let answer = prompter.ask(&question)?;
        match wizard.apply(answer)? {
            StepOutcome::Ask { notice, question: next } => {
                if let Some(notice) = notice {
                    prompter.notify(notice);
                }
                question = next;
            }
            StepOutcome::Invalid { message, question: retry } => {
                prompter.notify(&message);
                question = retry;
            }
            StepOutcome::Finished(definition) => return Ok(definition),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
