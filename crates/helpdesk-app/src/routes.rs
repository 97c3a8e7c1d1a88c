use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use helpdesk_core::{Direction, PageLocator, SessionId};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::session::{issue_session_id, session_cookie, session_from_headers};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NavigateParams {
    pub direction: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TicketDetailsParams {
    pub ticket_url: Option<String>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

async fn known_session(state: &AppState, headers: &HeaderMap) -> Option<SessionId> {
    let session_id = session_from_headers(headers)?;
    state
        .registry
        .has_session(&session_id)
        .await
        .then_some(session_id)
}

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    // Only ids this process issued are honoured; anything else gets a fresh one.
    let (session_id, issued) = match known_session(&state, &headers).await {
        Some(session_id) => (session_id, false),
        None => (issue_session_id(), true),
    };

    let navigator = state
        .registry
        .get_or_create_navigator(&session_id, &state.api_root, state.page_size)
        .await;
    let tickets = navigator.lock().await.current_batch().await;
    info!(
        session_id = session_id.as_str(),
        issued,
        tickets = tickets.len(),
        "served current ticket batch"
    );

    let mut response = Json(json!({ "tickets": tickets })).into_response();
    if issued {
        match session_cookie(&session_id) {
            Some(cookie) => {
                response.headers_mut().insert(header::SET_COOKIE, cookie);
            }
            None => warn!(
                session_id = session_id.as_str(),
                "session id is not a valid cookie value"
            ),
        }
    }
    response
}

pub async fn navigate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<NavigateParams>,
) -> Response {
    let Some(session_id) = known_session(&state, &headers).await else {
        return error_response(StatusCode::FORBIDDEN, "no session; load / first");
    };

    let Some(raw_direction) = params.direction else {
        return error_response(StatusCode::BAD_REQUEST, "direction is required (prev or next)");
    };
    let direction = match raw_direction.parse::<Direction>() {
        Ok(direction) => direction,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, error.to_string()),
    };

    let Some(navigator) = state.registry.navigator(&session_id).await else {
        return error_response(StatusCode::FORBIDDEN, "no session; load / first");
    };
    let tickets = navigator.lock().await.advance(direction).await;
    info!(
        session_id = session_id.as_str(),
        direction = direction.as_key(),
        tickets = tickets.len(),
        "navigation finished"
    );

    if tickets.is_empty() {
        return error_response(
            StatusCode::NOT_FOUND,
            format!("no tickets in the {} direction", direction.as_key()),
        );
    }
    Json(tickets).into_response()
}

pub async fn ticket_details(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<TicketDetailsParams>,
) -> Response {
    let Some(session_id) = known_session(&state, &headers).await else {
        return error_response(StatusCode::FORBIDDEN, "no session; load / first");
    };

    let Some(ticket_url) = params
        .ticket_url
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
    else {
        return error_response(StatusCode::BAD_REQUEST, "ticket_url is required");
    };
    // Outbound requests carry the API credentials; stay under the configured root.
    if !ticket_url.starts_with(&format!("{}/", state.api_root)) {
        return error_response(
            StatusCode::BAD_REQUEST,
            "ticket_url must point at the configured helpdesk API",
        );
    }

    let enricher = state
        .registry
        .get_or_create_enricher(&session_id, &state.api_root)
        .await;
    match enricher
        .get_enriched_ticket(&PageLocator::new(ticket_url.as_str()))
        .await
    {
        Some(enriched) => {
            info!(
                session_id = session_id.as_str(),
                ticket_url = ticket_url.as_str(),
                "served enriched ticket"
            );
            Json(enriched).into_response()
        }
        None => {
            info!(
                session_id = session_id.as_str(),
                ticket_url = ticket_url.as_str(),
                "ticket details unavailable"
            );
            error_response(StatusCode::NOT_FOUND, "ticket details unavailable")
        }
    }
}
