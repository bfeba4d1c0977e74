//! Core shared by the webhook and gateway clients: routing, dispatch and
//! command registration.

use log::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::error::DispairResult;
use crate::handler::{Handler, MissingHandler, NotSupported};
use crate::http::{ApiPath, HttpSession};
use crate::models::{Interaction, Response};
use crate::router::Router;
use crate::Error;

pub struct Client {
    config: ClientConfig,
    routers: Vec<Router>,
    http: HttpSession,
    missing: Box<dyn MissingHandler>,
}

impl Client {
    pub fn new(config: ClientConfig) -> DispairResult<Self> {
        config.validate()?;
        let http = HttpSession::with_api_base(&config.bot_token, &config.api_base)?;

        Ok(Self {
            config,
            routers: Vec::new(),
            http,
            missing: Box::new(NotSupported),
        })
    }

    /// Attach a router. Routers are searched in the order they were attached.
    pub fn attach_router(&mut self, router: Router) {
        debug!("attaching router with {} handlers", router.len());
        self.routers.push(router);
    }

    pub fn set_missing_handler(&mut self, missing: impl MissingHandler + 'static) {
        self.missing = Box::new(missing);
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &HttpSession {
        &self.http
    }

    pub fn handlers(&self) -> impl Iterator<Item = &Handler> {
        self.routers.iter().flat_map(Router::handlers)
    }

    pub fn find_handler(&self, name: &str) -> Option<&Handler> {
        self.routers.iter().find_map(|router| router.get(name))
    }

    /// Answer an application command interaction.
    pub async fn handle(&self, interaction: Interaction) -> Result<Response, Error> {
        match self.find_handler(interaction.name()) {
            Some(handler) => {
                debug!("dispatching /{}", handler.name);
                handler.handle(interaction).await
            }
            None => {
                info!("no handler defined for interaction: {}", interaction.name());
                Ok(self.missing.handle(&interaction))
            }
        }
    }

    /// Register every attached handler with Discord.
    ///
    /// Failures are logged and skipped. Returns how many registrations
    /// succeeded.
    pub async fn register_commands(&self) -> usize {
        let mut registered = 0;
        for handler in self.handlers() {
            for path in self.registration_paths(handler) {
                match self.http.post(&path, &handler.definition()).await {
                    Ok(_) => {
                        debug!("registered /{} at {}", handler.name, path.path());
                        registered += 1;
                    }
                    Err(e) => error!("failed to register /{}: {e}", handler.name),
                }
            }
        }
        info!("registered {registered} application commands");
        registered
    }

    /// Where a handler's definition is posted.
    ///
    /// Non-global handlers go to their own guilds, else the configured
    /// default guilds, else fall back to global registration.
    pub fn registration_paths(&self, handler: &Handler) -> Vec<ApiPath> {
        let application_id = &self.config.application_id;
        let global = ApiPath::new("/applications/{application_id}/commands")
            .param("application_id", application_id);

        if handler.is_global() {
            return vec![global];
        }

        let guilds = if handler.guilds.is_empty() {
            &self.config.guild_ids
        } else {
            &handler.guilds
        };

        if guilds.is_empty() {
            warn!("/{} has no guilds, registering globally", handler.name);
            return vec![global];
        }

        guilds
            .iter()
            .map(|guild_id| {
                ApiPath::new("/applications/{application_id}/guilds/{guild_id}/commands")
                    .param("application_id", application_id)
                    .param("guild_id", guild_id)
            })
            .collect()
    }
}
