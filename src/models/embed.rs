use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::Colour;

/// Discord embed object.
///
/// Only the rich embed fields dispair sends are modelled: title,
/// description and colour.
/// https://discord.com/developers/docs/resources/channel#embed-object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub colour: Colour,
}

impl Embed {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            colour: Colour::default(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }
}

impl Serialize for Embed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Embed", 4)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("type", "rich")?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("color", &self.colour.decimal())?;
        state.end()
    }
}
