//! HTTP endpoint receiving interactions from Discord.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response as HttpResponse},
    routing::post,
    Json,
};
use log::{debug, error, info, warn};
use serde_json::json;
use tokio::net::TcpListener;

use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::DispairResult;
use crate::handler::MissingHandler;
use crate::models::{Interaction, InteractionType};
use crate::router::Router;
use crate::verify::{SignatureVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER};

struct WebhookState {
    client: Client,
    verifier: SignatureVerifier,
}

/// Client for webhook usage.
///
/// Discord posts each interaction to `interaction_endpoint`; the reply is
/// sent back as the HTTP response.
pub struct WebhookClient {
    client: Client,
    verifier: SignatureVerifier,
}

impl WebhookClient {
    pub fn new(config: ClientConfig) -> DispairResult<Self> {
        let verifier = SignatureVerifier::from_hex(&config.public_key)?;
        let client = Client::new(config)?;
        Ok(Self { client, verifier })
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

    /// The axum app serving the interaction endpoint.
    pub fn into_router(self) -> axum::Router {
        let endpoint = self.client.config().interaction_endpoint.clone();
        let state = Arc::new(WebhookState {
            client: self.client,
            verifier: self.verifier,
        });

        axum::Router::new()
            .route(&endpoint, post(interaction_handler))
            .with_state(state)
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> DispairResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.into_router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }

    /// Register commands, then serve on `0.0.0.0:port` until Ctrl-C.
    pub async fn run(self) -> DispairResult<()> {
        self.client.register_commands().await;

        let config = self.client.config();
        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr).await?;
        info!(
            "listening for interactions on http://{}{}",
            addr, config.interaction_endpoint
        );

        self.serve(listener, async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received Ctrl-C, shutting down.");
        })
        .await
    }
}

async fn interaction_handler(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResponse {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let (Some(timestamp), Some(signature)) = (header(TIMESTAMP_HEADER), header(SIGNATURE_HEADER))
    else {
        debug!("rejecting request without signature headers");
        return (StatusCode::UNAUTHORIZED, "Unauthorised").into_response();
    };

    if state.verifier.verify(timestamp, &body, signature).is_err() {
        warn!("rejecting request with invalid signature");
        return (StatusCode::UNAUTHORIZED, "Unauthorised").into_response();
    }

    let interaction: Interaction = match serde_json::from_slice(&body) {
        Ok(interaction) => interaction,
        Err(e) => {
            warn!("malformed interaction payload: {e}");
            return (StatusCode::BAD_REQUEST, "Malformed interaction").into_response();
        }
    };

    match interaction.kind {
        InteractionType::Ping => {
            debug!("answering ping");
            Json(json!({ "type": 1 })).into_response()
        }
        InteractionType::ApplicationCommand => {
            let name = interaction.name().to_string();
            match state.client.handle(interaction).await {
                Ok(response) => Json(response.json()).into_response(),
                Err(e) => {
                    error!("Error in command `{name}`: {e:?}");
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            }
        }
        InteractionType::Other(kind) => {
            warn!("unsupported interaction type {kind}");
            (StatusCode::BAD_REQUEST, "Unsupported interaction type").into_response()
        }
    }
}
