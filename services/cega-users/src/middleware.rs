//! HTTP Basic authentication for instance credentials.
//!
//! The decoded `user:pass` pair names a LocalEGA instance and its
//! shared secret, not an end-user identity. Every failure mode gets the
//! same plain-text 401, with nothing about the cause leaking out.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::warn;

use crate::state::AppState;

const DENIED: (StatusCode, &str) = (StatusCode::UNAUTHORIZED, "Protected access\n");

fn decode_credentials(header_value: &str) -> Option<(String, String)> {
    let token = header_value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(token.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (instance, secret) = decoded.split_once(':')?;
    Some((instance.to_string(), secret.to_string()))
}

pub async fn basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let credentials = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(decode_credentials);

    let Some((instance, secret)) = credentials else {
        warn!("request without usable Basic credentials");
        return DENIED.into_response();
    };

    if !state.instances.authenticate(&instance, &secret) {
        warn!(%instance, "instance failed authentication");
        return DENIED.into_response();
    }

    next.run(request).await
}
