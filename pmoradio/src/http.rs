//! HTTP command surface of the connected mode.
//!
//! - `GET /command` serves a one-field form
//! - `POST /command` (`cmd`) runs the line through the interpreter and
//!   replies with its text
//! - `GET /api/status` returns the playback state as JSON

use crate::radio::RadioHandle;
use axum::{
    Form, Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::warn;

const COMMAND_PAGE: &str = include_str!("command.html");

#[derive(Debug, Deserialize)]
pub struct CommandForm {
    #[serde(default)]
    pub cmd: String,
}

/// Router of the command form and status API, to merge at `/`.
pub fn command_router(handle: RadioHandle) -> Router {
    Router::new()
        .route("/command", get(command_page).post(submit_command))
        .route("/api/status", get(status))
        .with_state(handle)
}

async fn command_page() -> Html<&'static str> {
    Html(COMMAND_PAGE)
}

async fn submit_command(
    State(handle): State<RadioHandle>,
    Form(form): Form<CommandForm>,
) -> Response {
    match handle.command(form.cmd).await {
        Ok(reply) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            reply,
        )
            .into_response(),
        Err(e) => {
            warn!(error=%e, "Command not delivered");
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
    }
}

async fn status(State(handle): State<RadioHandle>) -> Response {
    match handle.status().await {
        Ok(status) => Json(status).into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response(),
    }
}
