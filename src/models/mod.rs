//! Discord data models exchanged with the interactions API.

mod colour;
mod embed;
mod interaction;
mod member;
mod option;
mod response;

pub use colour::{Color, Colour};
pub use embed::Embed;
pub use interaction::{Interaction, InteractionData, InteractionOption, InteractionType};
pub use member::{Member, User};
pub use option::{CommandOption, OptionKind, OptionValue, Options};
pub use response::{Response, CHANNEL_MESSAGE_WITH_SOURCE};
