//! Lookup handler and the fixed response envelope.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cega_core::{IdType, UserRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::AppState;

/// Envelope the legacy CentralEGA clients expect, field for field.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub header: Header,
    pub response: ResultSet,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub api_version: &'static str,
    pub code: &'static str,
    pub service: &'static str,
    pub developer_message: &'static str,
    pub user_message: &'static str,
    pub error_code: &'static str,
    pub doc_link: &'static str,
    pub error_stack: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    pub num_total_results: usize,
    pub result_type: &'static str,
    pub result: Vec<UserRecord>,
}

impl Envelope {
    /// Wraps one record the way a successful lookup reports it.
    #[must_use]
    pub fn single(record: UserRecord) -> Self {
        Self {
            header: Header {
                api_version: "v1",
                code: "200",
                service: "users",
                developer_message: "",
                user_message: "OK",
                error_code: "1",
                doc_link: "https://ega-archive.org",
                error_stack: "",
            },
            response: ResultSet {
                num_total_results: 1,
                result_type: "eu.crg.ega.microservice.dto.lega.v1.users.LocalEgaUser",
                result: vec![record],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(rename = "idType")]
    id_type: Option<String>,
}

/// `GET /lega/v1/legas/users/{identifier}?idType={username|uid}`
///
/// Error responses are plain text with no envelope: 400 for a missing
/// or unsupported idType and for an unknown user. Nothing here ever
/// touches the shared state beyond the read.
pub async fn user(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Query(query): Query<UserQuery>,
) -> Response {
    let id_type = match query.id_type.as_deref().map(str::parse::<IdType>) {
        Some(Ok(id_type)) => id_type,
        _ => {
            return (StatusCode::BAD_REQUEST, "Missing or wrong idType\n").into_response();
        }
    };

    debug!(%identifier, ?id_type, "directory lookup");
    match state.directory.lookup(&identifier, id_type) {
        Some(record) => Json(Envelope::single(record.clone())).into_response(),
        None => (StatusCode::BAD_REQUEST, "No info for that user\n").into_response(),
    }
}

/// Liveness probe; always succeeds while the process runs.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
