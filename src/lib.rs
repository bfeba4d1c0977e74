pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handler;
pub mod http;
pub mod models;
pub mod router;
pub mod verify;
pub mod webhook;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{DispairError, DispairResult};
pub use gateway::GatewayClient;
pub use handler::{Handler, MissingHandler};
pub use models::{Colour, CommandOption, Embed, Interaction, Member, Options, Response};
pub use router::Router;
pub use webhook::WebhookClient;

/// Error type returned by interaction handler functions.
pub type Error = Box<dyn std::error::Error + Send + Sync>;
