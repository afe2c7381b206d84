use crate::capability::ValueType;
use serde_json::{Number, Value};

/// Scratch space for the answers collected during one wizard run.
///
/// Fields are overwritten as the user revisits attribute and command
/// creation; only the schema constraints need an explicit reset after each
/// attribute commit, since a later attribute of a different type would never
/// ask for them again.
#[derive(Debug, Clone, Default)]
pub struct AnswerStore {
    pub attribute_name: Option<String>,
    pub attribute_type: Option<ValueType>,
    pub schema_min_value: Option<Number>,
    pub schema_max_value: Option<Number>,
    pub schema_max_length: Option<u64>,
    pub attribute_setter: Option<bool>,
    pub command_name: Option<String>,
    pub argument_name: Option<String>,
    pub argument_type: Option<ValueType>,
    pub argument_optional: Option<bool>,
    pub basic_command_value: Option<Value>,
}

impl AnswerStore {
    /// Clear the schema constraints so they cannot leak into the next
    /// attribute's schema.
    pub fn reset_schema_constraints(&mut self) {
        self.schema_min_value = None;
        self.schema_max_value = None;
        self.schema_max_length = None;
    }
}
