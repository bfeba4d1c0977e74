/// Discord API version every route is built against.
pub const API_VERSION: u8 = 10;

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Parameters that give a route its own rate limit bucket.
const MAJOR_PARAMETERS: [&str; 5] = [
    "guild_id",
    "channel_id",
    "webhook_id",
    "interaction_id",
    "interaction_token",
];

/// A route template plus the parameters filled into it.
///
/// The template (`/channels/{channel_id}/messages`) and its major
/// parameters identify the rate limit bucket the request belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath {
    template: String,
    params: Vec<(String, String)>,
}

impl ApiPath {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// The template with every `{name}` replaced by its parameter.
    pub fn path(&self) -> String {
        self.params
            .iter()
            .fold(self.template.clone(), |path, (name, value)| {
                path.replace(&format!("{{{name}}}"), value)
            })
    }

    pub fn url(&self, api_base: &str) -> String {
        format!("{}{}", api_base.trim_end_matches('/'), self.path())
    }

    /// Rate limit bucket key.
    pub fn bucket(&self) -> String {
        let majors: Vec<&str> = MAJOR_PARAMETERS
            .iter()
            .map(|major| {
                self.params
                    .iter()
                    .find(|(name, _)| name == major)
                    .map(|(_, value)| value.as_str())
                    .unwrap_or("0")
            })
            .collect();

        format!("{}::{}", majors.join("-"), self.template)
    }
}
