#![allow(dead_code)]

use ed25519_dalek::{Signer, SigningKey};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const TIMESTAMP: &str = "1700000000";

pub fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&[
        0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4, 0x92, 0xec, 0x2c,
        0xc4, 0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b, 0xac, 0x03, 0x1c, 0xae,
        0x7f, 0x60,
    ])
}

pub fn public_key_hex() -> String {
    hex::encode(signing_key().verifying_key().to_bytes())
}

/// Hex signature Discord would send for `timestamp ++ body`.
pub fn sign(timestamp: &str, body: &str) -> String {
    let message = format!("{timestamp}{body}");
    hex::encode(signing_key().sign(message.as_bytes()).to_bytes())
}

/// Serve `app` on an ephemeral port, returning its base URL.
pub async fn spawn_app(app: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn command_payload(name: &str, options: Value) -> Value {
    json!({
        "id": "1000",
        "application_id": "1234",
        "type": 2,
        "token": "interaction-token",
        "guild_id": "566407576686952480",
        "channel_id": "2000",
        "member": { "user": { "id": "42", "username": "ferris" } },
        "data": { "id": "3000", "name": name, "options": options }
    })
}

pub fn message_response(content: &str) -> Value {
    json!({
        "type": 4,
        "data": {
            "tts": false,
            "content": content,
            "embeds": [],
            "allowed_mentions": { "parse": [] }
        }
    })
}
