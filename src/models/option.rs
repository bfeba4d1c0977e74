use std::collections::HashMap;

use log::warn;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::{InteractionOption, Member};

/// Application command option types dispair can convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Integer,
    Boolean,
    User,
}

impl OptionKind {
    pub const fn code(self) -> u8 {
        match self {
            Self::String => 3,
            Self::Integer => 4,
            Self::Boolean => 5,
            Self::User => 6,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            3 => Some(Self::String),
            4 => Some(Self::Integer),
            5 => Some(Self::Boolean),
            6 => Some(Self::User),
            _ => None,
        }
    }
}

impl Serialize for OptionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Discord Interaction option declaration.
///
/// https://discord.com/developers/docs/interactions/application-commands#application-command-object-application-command-option-structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOption {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub required: bool,
}

impl CommandOption {
    pub fn new(kind: OptionKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            name: name.into().to_lowercase(),
            // Discord rejects empty descriptions
            description: if description.is_empty() {
                " ".to_string()
            } else {
                description
            },
            kind,
            required: true,
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionKind::String, name, description)
    }

    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionKind::Integer, name, description)
    }

    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionKind::Boolean, name, description)
    }

    pub fn user(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionKind::User, name, description)
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// A resolved option argument.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    User(Member),
}

impl OptionValue {
    fn convert(option: &InteractionOption) -> Option<Self> {
        let value = &option.value;
        match OptionKind::from_code(option.kind)? {
            OptionKind::String => Some(Self::String(match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })),
            OptionKind::Integer => value
                .as_i64()
                .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
                .map(Self::Integer),
            OptionKind::Boolean => value
                .as_bool()
                .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
                .map(Self::Boolean),
            OptionKind::User => value.as_str().map(|id| Self::User(Member::from_user_id(id))),
        }
    }
}

/// Arguments passed to a handler, keyed by option name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    values: HashMap<String, OptionValue>,
}

impl Options {
    /// Resolve the raw `data.options` of an interaction.
    ///
    /// Option types other than string, integer, boolean and user are
    /// skipped.
    pub fn from_interaction_options(options: &[InteractionOption]) -> Self {
        let mut values = HashMap::with_capacity(options.len());
        for option in options {
            match OptionValue::convert(option) {
                Some(value) => {
                    values.insert(option.name.to_lowercase(), value);
                }
                None => warn!(
                    "skipping option '{}' of type {} with value {}",
                    option.name, option.kind, option.value
                ),
            }
        }
        Self { values }
    }

    /// Look up an option by name, ignoring case like command names.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(&name.to_lowercase())
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            OptionValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            OptionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        match self.get(name)? {
            OptionValue::User(m) => Some(m),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
