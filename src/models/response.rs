use serde_json::{json, Value};

use super::Embed;

/// Interaction callback type CHANNEL_MESSAGE_WITH_SOURCE.
pub const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;

/// Response to be sent back to Discord.
///
/// This holds the text content and embeds of the reply. Mentions in the
/// content are never parsed, so a reply cannot ping anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub content: String,
    pub embeds: Vec<Embed>,
}

impl Response {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            embeds: Vec::new(),
        }
    }

    pub fn embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    /// The interaction callback body for this response.
    pub fn json(&self) -> Value {
        json!({
            "type": CHANNEL_MESSAGE_WITH_SOURCE,
            "data": {
                "tts": false,
                "content": self.content,
                "embeds": self.embeds,
                "allowed_mentions": { "parse": [] }
            }
        })
    }
}

impl From<String> for Response {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

impl From<&str> for Response {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<Embed> for Response {
    fn from(embed: Embed) -> Self {
        Self::default().embed(embed)
    }
}

impl From<bool> for Response {
    fn from(value: bool) -> Self {
        Self::new(value.to_string())
    }
}

macro_rules! response_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Response {
                fn from(value: $t) -> Self {
                    Self::new(value.to_string())
                }
            }
        )*
    };
}

response_from_integer!(i32, i64, u32, u64, usize);
