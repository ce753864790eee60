use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthzResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub read_only: bool,
    pub database: &'static str,
}

pub async fn healthz(State(state): State<AppState>) -> Json<HealthzResponse> {
    let (status, database) = match state.db.ping().await {
        Ok(()) => ("ok", "ok"),
        Err(err) => {
            tracing::warn!(error = %err, "database ping failed");
            ("degraded", "unreachable")
        }
    };

    Json(HealthzResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        read_only: state.read_only,
        database,
    })
}
