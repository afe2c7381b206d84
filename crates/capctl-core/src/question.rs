use regex::Regex;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Action menu choices
// ---------------------------------------------------------------------------

pub const ACTION_ADD_ATTRIBUTE: &str = "Add an attribute";
pub const ACTION_ADD_COMMAND: &str = "Add a command";
pub const ACTION_FINISH: &str = "Finish & Create";

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

/// One question the wizard wants answered. The state machine emits these as
/// effect objects; a prompt frontend renders them and feeds the answer back.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub message: String,
    pub kind: QuestionKind,
    pub validator: Validator,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    /// Free-text input.
    Input,
    /// Pick one of a fixed set of choices.
    Select { choices: Vec<String> },
    /// Yes/no confirmation.
    Confirm,
}

/// Validation predicate attached to a free-text question.
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// Starts alphanumeric, 2-36 characters, alphanumerics and spaces only.
    CapabilityName,
    /// Non-empty input; `error` is shown verbatim on failure.
    NonEmpty { error: &'static str },
    /// Blank (no value) or a finite number.
    OptionalNumeric,
    /// A finite number within the recorded bounds.
    NumberInRange {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    /// Text no longer than the recorded maximum length.
    TextMaxLength { max_length: Option<u64> },
    None,
}

impl Question {
    pub fn input(message: impl Into<String>, validator: Validator) -> Self {
        Self {
            message: message.into(),
            kind: QuestionKind::Input,
            validator,
        }
    }

    pub fn select(message: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            message: message.into(),
            kind: QuestionKind::Select { choices },
            validator: Validator::None,
        }
    }

    pub fn confirm(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: QuestionKind::Confirm,
            validator: Validator::None,
        }
    }

    /// Validation predicate for free-text input: `Ok(())` to accept, or the
    /// message to show before re-prompting the same step.
    pub fn validate(&self, input: &str) -> Result<(), String> {
        match &self.validator {
            Validator::CapabilityName => {
                if capability_name_pattern().is_match(input) {
                    Ok(())
                } else {
                    Err("Invalid capability name".to_string())
                }
            }
            Validator::NonEmpty { error } => {
                if input.is_empty() {
                    Err((*error).to_string())
                } else {
                    Ok(())
                }
            }
            Validator::OptionalNumeric => {
                if input.is_empty() || parse_finite(input).is_some() {
                    Ok(())
                } else {
                    Err("Please enter a numeric value".to_string())
                }
            }
            Validator::NumberInRange { minimum, maximum } => {
                let value = parse_finite(input)
                    .ok_or_else(|| "Please enter a numeric value".to_string())?;
                if minimum.is_some_and(|min| value < min) {
                    return Err("Number below given minimum value".to_string());
                }
                if maximum.is_some_and(|max| value > max) {
                    return Err("Number above given maximum value".to_string());
                }
                Ok(())
            }
            Validator::TextMaxLength { max_length } => {
                if max_length.is_some_and(|max| input.chars().count() as u64 > max) {
                    Err("String longer than given maximum length".to_string())
                } else {
                    Ok(())
                }
            }
            Validator::None => Ok(()),
        }
    }
}

fn parse_finite(input: &str) -> Option<f64> {
    input.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn capability_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new("^[a-zA-Z0-9][a-zA-Z0-9 ]{1,35}$").expect("capability name pattern compiles")
    })
}

// ---------------------------------------------------------------------------
// Answer
// ---------------------------------------------------------------------------

/// A prompt frontend's answer to a [`Question`], tagged by question kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Text(String),
    Choice(String),
    Confirm(bool),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
