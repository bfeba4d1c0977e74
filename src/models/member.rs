use serde::{Deserialize, Serialize};

/// Discord user, as carried by guild members and interactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    #[serde(default)]
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Discord guild member.
///
/// https://discord.com/developers/docs/resources/guild#guild-member-object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user: User,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
}

impl Member {
    /// A member known only by its user id, as delivered in USER options.
    pub fn from_user_id(user_id: impl Into<String>) -> Self {
        Self {
            user: User {
                id: user_id.into(),
                ..User::default()
            },
            nick: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.user.id
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    /// Mention string for the member, `<@id>`.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.user.id)
    }
}

impl From<User> for Member {
    fn from(user: User) -> Self {
        Self { user, nick: None }
    }
}
