//! Router for creating interaction handlers.

use std::collections::HashMap;
use std::future::Future;

use log::debug;

use crate::handler::Handler;
use crate::models::{CommandOption, Interaction, Options, Response};
use crate::Error;

/// A set of handlers keyed by lower-cased command name.
#[derive(Debug, Clone, Default)]
pub struct Router {
    handlers: HashMap<String, Handler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start declaring a command; finish with [`HandlerBuilder::handle`].
    pub fn interaction(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> HandlerBuilder<'_> {
        HandlerBuilder {
            router: self,
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
            global: false,
            guilds: Vec::new(),
        }
    }

    /// Store a handler, replacing any previous handler of the same name.
    pub fn add(&mut self, handler: Handler) -> &mut Self {
        debug!("adding handler for /{}", handler.name);
        self.handlers.insert(handler.name.clone(), handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(&name.to_lowercase())
    }

    pub fn handlers(&self) -> impl Iterator<Item = &Handler> {
        self.handlers.values()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Declaration of a command in progress.
pub struct HandlerBuilder<'a> {
    router: &'a mut Router,
    name: String,
    description: String,
    options: Vec<CommandOption>,
    global: bool,
    guilds: Vec<String>,
}

impl<'a> HandlerBuilder<'a> {
    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Register the command for every guild the bot is in.
    pub fn global(mut self) -> Self {
        self.global = true;
        self
    }

    /// Register the command in a specific guild.
    pub fn guild(mut self, guild_id: impl Into<String>) -> Self {
        self.guilds.push(guild_id.into());
        self
    }

    pub fn handle<F, Fut, R>(self, function: F) -> &'a mut Router
    where
        F: Fn(Interaction, Options) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, Error>> + Send + 'static,
        R: Into<Response> + Send + 'static,
    {
        let HandlerBuilder {
            router,
            name,
            description,
            options,
            global,
            guilds,
        } = self;

        let mut handler = Handler::new(name, description, function);
        handler.options = options;
        handler.global = global;
        handler.guilds = guilds;
        router.add(handler)
    }
}
