//! Client receiving interactions over the Discord gateway.
//!
//! Instead of exposing an HTTP endpoint, the bot keeps a gateway WebSocket
//! open and answers `INTERACTION_CREATE` dispatches through the REST
//! callback route.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::task::JoinSet;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message as WsMessage};

use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::{DispairError, DispairResult};
use crate::handler::MissingHandler;
use crate::http::{ApiPath, API_VERSION};
use crate::models::Interaction;
use crate::router::Router;

/// GUILDS | GUILD_MESSAGES
pub const DEFAULT_INTENTS: u64 = 513;

pub mod opcode {
    pub const DISPATCH: u8 = 0;
    pub const HEARTBEAT: u8 = 1;
    pub const IDENTIFY: u8 = 2;
    pub const RECONNECT: u8 = 7;
    pub const INVALID_SESSION: u8 = 9;
    pub const HELLO: u8 = 10;
    pub const HEARTBEAT_ACK: u8 = 11;
}

/// Envelope of every gateway message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayPayload {
    pub op: u8,

    #[serde(default)]
    pub d: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Hello {
    heartbeat_interval: u64,
}

/// Response of `GET /gateway/bot`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GatewayInfo {
    pub url: String,

    #[serde(default)]
    pub shards: u32,

    #[serde(default)]
    pub session_start_limit: Value,
}

/// Build the Identify payload for `token`.
pub fn identify_payload(token: &str, intents: u64) -> Value {
    json!({
        "op": opcode::IDENTIFY,
        "d": {
            "token": token,
            "intents": intents,
            "properties": {
                "os": std::env::consts::OS,
                "browser": "dispair",
                "device": "dispair"
            }
        }
    })
}

pub fn heartbeat_payload(sequence: Option<u64>) -> Value {
    json!({ "op": opcode::HEARTBEAT, "d": sequence })
}

/// Client for usage with the Discord gateway.
pub struct GatewayClient {
    client: Client,
    intents: u64,
}

impl GatewayClient {
    pub fn new(config: ClientConfig) -> DispairResult<Self> {
        Ok(Self {
            client: Client::new(config)?,
            intents: DEFAULT_INTENTS,
        })
    }

    pub fn intents(mut self, intents: u64) -> Self {
        self.intents = intents;
        self
    }

    pub fn attach_router(&mut self, router: Router) {
        self.client.attach_router(router);
    }

    pub fn set_missing_handler(&mut self, missing: impl MissingHandler + 'static) {
        self.client.set_missing_handler(missing);
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Request the current gateway endpoint and metadata.
    pub async fn get_gateway(&self) -> DispairResult<GatewayInfo> {
        debug!("requesting gateway");
        let body = self
            .client
            .http()
            .get(&ApiPath::new("/gateway/bot"))
            .await?
            .ok_or_else(|| DispairError::Gateway("empty /gateway/bot response".into()))?;
        Ok(serde_json::from_value(body)?)
    }

    /// Register commands, connect and handle interactions until the
    /// gateway closes the connection.
    pub async fn run(self) -> DispairResult<()> {
        debug!("starting up GatewayClient");
        self.client.register_commands().await;

        let gateway = self.get_gateway().await?;
        info!(
            "gateway {} recommends {} shards",
            gateway.url, gateway.shards
        );
        self.connect(&gateway.url).await
    }

    /// Connect to `gateway_url` and run the handle loop.
    pub async fn connect(self, gateway_url: &str) -> DispairResult<()> {
        let ws_url = format!(
            "{}/?v={API_VERSION}&encoding=json",
            gateway_url.trim_end_matches('/')
        );
        debug!("connecting to gateway at {ws_url}");
        let (ws_stream, _) = connect_async(ws_url.as_str()).await?;
        debug!("connected to gateway");

        let token = self.client.config().bot_token.clone();
        let intents = self.intents;
        let client = Arc::new(self.client);
        let (mut write, mut read) = ws_stream.split();

        // Handshake: the first message must be Hello.
        let hello: Hello = match read.next().await {
            Some(Ok(WsMessage::Text(text))) => {
                let payload: GatewayPayload = serde_json::from_str(&text)?;
                if payload.op != opcode::HELLO {
                    return Err(DispairError::Gateway(
                        "Gateway did not respond with handshake".into(),
                    ));
                }
                serde_json::from_value(payload.d.unwrap_or_default())?
            }
            Some(Ok(msg)) => {
                return Err(DispairError::Gateway(format!("unexpected message: {msg:?}")))
            }
            Some(Err(e)) => return Err(e.into()),
            None => {
                return Err(DispairError::Gateway(
                    "connection closed before Hello".into(),
                ))
            }
        };
        if hello.heartbeat_interval == 0 {
            return Err(DispairError::Gateway(
                "Hello carried a zero heartbeat interval".into(),
            ));
        }
        debug!("received Hello, heartbeat every {}ms", hello.heartbeat_interval);

        debug!("identifying through gateway");
        write
            .send(WsMessage::Text(identify_payload(&token, intents).to_string().into()))
            .await?;

        let mut sequence: Option<u64> = None;
        let mut callbacks = JoinSet::new();
        let mut heartbeat = tokio::time::interval(Duration::from_millis(hello.heartbeat_interval));
        heartbeat.tick().await;

        debug!("beginning main handle loop");
        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    debug!("sending heartbeat");
                    write
                        .send(WsMessage::Text(heartbeat_payload(sequence).to_string().into()))
                        .await?;
                }
                Some(joined) = callbacks.join_next(), if !callbacks.is_empty() => {
                    if let Err(e) = joined {
                        error!("interaction task failed: {e}");
                    }
                }
                msg = read.next() => {
                    let text = match msg {
                        Some(Ok(WsMessage::Text(text))) => text,
                        Some(Ok(WsMessage::Close(frame))) => {
                            info!("gateway closed the connection: {frame:?}");
                            break;
                        }
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => {
                            error!("WebSocket error: {e}");
                            break;
                        }
                        None => break,
                    };

                    let payload: GatewayPayload = match serde_json::from_str(&text) {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!("failed to parse gateway payload: {e}");
                            continue;
                        }
                    };
                    if let Some(s) = payload.s {
                        sequence = Some(s);
                    }

                    match payload.op {
                        opcode::DISPATCH => {
                            if payload.t.as_deref() == Some("INTERACTION_CREATE") {
                                dispatch_interaction(
                                    &client,
                                    &mut callbacks,
                                    payload.d.unwrap_or_default(),
                                );
                            }
                        }
                        opcode::HEARTBEAT => {
                            write
                                .send(WsMessage::Text(heartbeat_payload(sequence).to_string().into()))
                                .await?;
                        }
                        opcode::HEARTBEAT_ACK => debug!("heartbeat acknowledged"),
                        opcode::RECONNECT | opcode::INVALID_SESSION => {
                            warn!("gateway asked us to reconnect (op {})", payload.op);
                            break;
                        }
                        op => debug!("unhandled opcode {op}"),
                    }
                }
            }
        }

        error!("Channel was closed");

        if !callbacks.is_empty() {
            debug!("waiting on {} interaction callbacks", callbacks.len());
        }
        while let Some(joined) = callbacks.join_next().await {
            if let Err(e) = joined {
                error!("interaction task failed: {e}");
            }
        }
        Ok(())
    }
}

/// Answer an `INTERACTION_CREATE` dispatch in the background.
fn dispatch_interaction(client: &Arc<Client>, callbacks: &mut JoinSet<()>, data: Value) {
    let interaction: Interaction = match serde_json::from_value(data) {
        Ok(interaction) => interaction,
        Err(e) => {
            warn!("malformed interaction: {e}");
            return;
        }
    };
    debug!("received interaction for: {}", interaction.name());

    let client = Arc::clone(client);
    callbacks.spawn(async move {
        let path = ApiPath::new("/interactions/{interaction_id}/{interaction_token}/callback")
            .param("interaction_id", &interaction.id)
            .param("interaction_token", &interaction.token);
        let name = interaction.name().to_string();

        let response = match client.handle(interaction).await {
            Ok(response) => response,
            Err(e) => {
                error!("Error in command `{name}`: {e:?}");
                return;
            }
        };

        if let Err(e) = client.http().post(&path, &response.json()).await {
            error!("failed to answer `{name}`: {e}");
        }
    });
}
