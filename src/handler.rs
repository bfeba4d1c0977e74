//! Interaction handlers and their registration payload.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::{json, Value};

use crate::models::{CommandOption, Interaction, Options, Response};
use crate::Error;

type Callback =
    Arc<dyn Fn(Interaction, Options) -> BoxFuture<'static, Result<Response, Error>> + Send + Sync>;

/// A slash command and the function answering it.
#[derive(Clone)]
pub struct Handler {
    pub name: String,
    pub description: String,
    pub options: Vec<CommandOption>,
    pub global: bool,
    pub guilds: Vec<String>,
    callback: Callback,
}

impl Handler {
    pub fn new<F, Fut, R>(
        name: impl Into<String>,
        description: impl Into<String>,
        function: F,
    ) -> Self
    where
        F: Fn(Interaction, Options) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, Error>> + Send + 'static,
        R: Into<Response> + Send + 'static,
    {
        let callback: Callback = Arc::new(move |interaction: Interaction, options: Options| {
            let fut = function(interaction, options);
            let boxed: BoxFuture<'static, Result<Response, Error>> =
                Box::pin(async move { fut.await.map(Into::into) });
            boxed
        });

        Self {
            name: name.into().to_lowercase(),
            description: description.into(),
            options: Vec::new(),
            global: false,
            guilds: Vec::new(),
            callback,
        }
    }

    /// Resolve the interaction's options and run the handler function.
    pub async fn handle(&self, interaction: Interaction) -> Result<Response, Error> {
        let options = Options::from_interaction_options(interaction.options());
        (self.callback)(interaction, options).await
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    /// Application command body used when registering with Discord.
    pub fn definition(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "options": self.options,
        })
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("options", &self.options)
            .field("global", &self.global)
            .field("guilds", &self.guilds)
            .finish_non_exhaustive()
    }
}

/// Reply used when no router knows the invoked command.
///
/// Implement this to customise what users see for stale or unknown
/// commands.
pub trait MissingHandler: Send + Sync {
    fn handle(&self, interaction: &Interaction) -> Response {
        Response::new(format!("> Command {} is not supported", interaction.name()))
    }
}

/// The default missing handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotSupported;

impl MissingHandler for NotSupported {}
