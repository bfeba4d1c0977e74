use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::{Member, User};

/// Kind of interaction Discord delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionType {
    Ping,
    ApplicationCommand,
    Other(u8),
}

impl From<u8> for InteractionType {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Ping,
            2 => Self::ApplicationCommand,
            n => Self::Other(n),
        }
    }
}

impl From<InteractionType> for u8 {
    fn from(value: InteractionType) -> Self {
        match value {
            InteractionType::Ping => 1,
            InteractionType::ApplicationCommand => 2,
            InteractionType::Other(n) => n,
        }
    }
}

impl<'de> Deserialize<'de> for InteractionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u8::deserialize(deserializer).map(Self::from)
    }
}

impl Serialize for InteractionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8((*self).into())
    }
}

/// An option value exactly as it arrives in `data.options`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionOption {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: u8,

    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionData {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub options: Vec<InteractionOption>,
}

/// Discord Interaction.
///
/// https://discord.com/developers/docs/interactions/receiving-and-responding#interaction-object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,

    #[serde(default)]
    pub application_id: Option<String>,

    #[serde(rename = "type")]
    pub kind: InteractionType,

    #[serde(default)]
    pub data: Option<InteractionData>,

    #[serde(default)]
    pub guild_id: Option<String>,

    #[serde(default)]
    pub channel_id: Option<String>,

    #[serde(default)]
    pub member: Option<Member>,

    #[serde(default)]
    pub user: Option<User>,

    #[serde(default)]
    pub token: String,
}

impl Interaction {
    /// Name of the invoked command, empty for interactions without data.
    pub fn name(&self) -> &str {
        self.data.as_ref().map(|d| d.name.as_str()).unwrap_or_default()
    }

    /// The member (or, in DMs, the user) that invoked the command.
    pub fn author(&self) -> Option<Member> {
        self.member
            .clone()
            .or_else(|| self.user.clone().map(Member::from))
    }

    pub fn options(&self) -> &[InteractionOption] {
        self.data
            .as_ref()
            .map(|d| d.options.as_slice())
            .unwrap_or_default()
    }
}
