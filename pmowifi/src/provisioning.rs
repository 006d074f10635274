//! HTTP surface of the provisioning mode.
//!
//! - `GET /` serves the settings form
//! - `POST /` stores the submitted `ssid` / `pass` / `ip` fields and
//!   schedules a restart after the grace delay

use crate::credentials::ProvisioningSubmission;
use crate::restart::{Restarter, schedule_restart};
use axum::{
    Form, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse},
    routing::get,
};
use pmoconfig::{ConfigStore, SettingKey};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;
use tracing::{debug, warn};

const FORM_PAGE: &str = include_str!("provisioning.html");

/// Shared state of the provisioning handlers.
#[derive(Clone)]
pub struct ProvisioningState {
    store: Arc<dyn ConfigStore>,
    restarter: Arc<dyn Restarter>,
    restart_delay: Duration,
    restart_scheduled: Arc<AtomicBool>,
}

impl ProvisioningState {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        restarter: Arc<dyn Restarter>,
        restart_delay: Duration,
    ) -> Self {
        Self {
            store,
            restarter,
            restart_delay,
            restart_scheduled: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Router of the provisioning form, to merge at `/`.
pub fn provisioning_router(state: ProvisioningState) -> Router {
    Router::new()
        .route("/", get(form_page).post(submit_settings))
        .with_state(state)
}

async fn form_page() -> Html<&'static str> {
    debug!("Serving provisioning form");
    Html(FORM_PAGE)
}

async fn submit_settings(
    State(state): State<ProvisioningState>,
    Form(submission): Form<ProvisioningSubmission>,
) -> impl IntoResponse {
    let written = submission.apply(state.store.as_ref());
    debug!(?written, "Provisioning form submitted");

    // adresse annoncée : celle soumise, sinon celle déjà enregistrée
    let ip = submission
        .ip
        .as_deref()
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| state.store.read(SettingKey::StaticIp));

    if state.restart_scheduled.swap(true, Ordering::SeqCst) {
        warn!("Restart already scheduled");
    } else {
        schedule_restart(state.restarter.clone(), state.restart_delay);
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("Done. Device will restart, connect to your router and go to IP address: {ip}"),
    )
}
