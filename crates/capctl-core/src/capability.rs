use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// ValueType
// ---------------------------------------------------------------------------

/// The primitive type of an attribute value or command argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Integer,
    Number,
    String,
    Boolean,
}

impl ValueType {
    pub fn all() -> &'static [ValueType] {
        &[
            ValueType::Integer,
            ValueType::Number,
            ValueType::String,
            ValueType::Boolean,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Integer => "integer",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
        }
    }

    /// Integer and number values carry minimum/maximum bounds.
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueType::Integer | ValueType::Number)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ValueType {
    type Err = crate::error::CapctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "integer" => Ok(ValueType::Integer),
            "number" => Ok(ValueType::Number),
            "string" => Ok(ValueType::String),
            "boolean" => Ok(ValueType::Boolean),
            _ => Err(crate::error::CapctlError::UnknownValueType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ValueSchema
// ---------------------------------------------------------------------------

/// JSON-Schema-like constraints on a single primitive value. Used both for
/// an attribute's `value` property and for command argument schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSchema {
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

impl ValueSchema {
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            minimum: None,
            maximum: None,
            max_length: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AttributeSchema
// ---------------------------------------------------------------------------

/// The object schema wrapping an attribute's value: exactly one property
/// named `value`, no additional properties, `value` required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: AttributeProperties,
    pub additional_properties: bool,
    pub required: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeProperties {
    pub value: ValueSchema,
}

impl AttributeSchema {
    pub fn for_value(value: ValueSchema) -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: AttributeProperties { value },
            additional_properties: false,
            required: vec!["value".to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// Attribute
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub schema: AttributeSchema,
    /// Name of the command that sets this attribute, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setter: Option<String>,
    /// Fixed-value commands that each set this attribute to one constant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_commands: Option<Vec<EnumCommand>>,
}

impl Attribute {
    pub fn new(value: ValueSchema) -> Self {
        Self {
            schema: AttributeSchema::for_value(value),
            setter: None,
            enum_commands: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumCommand {
    pub command: String,
    pub value: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Command / Argument
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    /// Positional call order is significant.
    #[serde(default)]
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    pub name: String,
    pub optional: bool,
    pub schema: ValueSchema,
}

// ---------------------------------------------------------------------------
// CapabilityDefinition
// ---------------------------------------------------------------------------

/// A capability as submitted to the platform: a name plus attribute and
/// command schemas. At least one attribute or command must exist before
/// the definition is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Attribute>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub commands: BTreeMap<String, Command>,
}

impl CapabilityDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            commands: BTreeMap::new(),
        }
    }
}

/// Setter command name for an attribute: `set` + name with the first
/// character upper-cased (`level` -> `setLevel`).
pub fn setter_command_name(attribute_name: &str) -> String {
    let mut chars = attribute_name.chars();
    match chars.next() {
        Some(first) => format!("set{}{}", first.to_uppercase(), chars.as_str()),
        None => "set".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Platform responses
// ---------------------------------------------------------------------------

/// A capability as returned by the platform after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub id: String,
    pub version: u32,
    #[serde(flatten)]
    pub definition: CapabilityDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    pub name: String,
    pub owner_type: String,
    pub owner_id: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
