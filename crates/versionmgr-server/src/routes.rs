use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{
        ConnectInfo, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    middleware,
    routing::{MethodRouter, get, post},
};
use sea_orm::TransactionTrait;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use versionmgr_view::{ReportRequest, ReportResponse, encode, encode_list};

use crate::error::ApiError;
use crate::health;
use crate::projection;
use crate::request_meta::request_id;
use crate::state::AppState;
use crate::store::{self, Report};

/// Registers `path` with and without a trailing slash.
fn both(router: Router<AppState>, path: &str, route: MethodRouter<AppState>) -> Router<AppState> {
    router.route(path, route.clone()).route(&format!("{path}/"), route)
}

pub fn router(state: AppState) -> Router {
    let mut router = Router::new();
    router = both(router, "/version", post(report_version).get(list_versions));
    router = both(router, "/version/:id", get(version_detail));
    router = both(router, "/cluster", get(list_clusters));
    router = both(router, "/cluster/:id", get(cluster_detail));
    router = both(router, "/host", get(list_hosts));
    router = both(router, "/host/:id", get(host_detail));
    router = both(router, "/application", get(list_applications));
    router = both(router, "/application/:id", get(application_detail));
    router = both(router, "/deployment", get(list_deployments));
    router = both(router, "/deployment/:id", get(deployment_detail));
    router = both(router, "/customer", get(list_customers));
    router = both(router, "/customer/:id", get(customer_detail));
    router = both(router, "/release", get(list_releases));
    router = both(router, "/release/:id", get(release_detail));

    router
        .route("/healthz", get(health::healthz))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id))
        .with_state(state)
}

fn id_of(path: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::malformed(e.body_text()))
}

async fn report_version(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<ReportResponse>, ApiError> {
    if state.read_only {
        return Err(ApiError::ReadOnly);
    }

    let Json(req) = body.map_err(|e| ApiError::malformed(e.body_text()))?;
    let peer_host = peer.map(|ConnectInfo(addr)| addr.ip().to_string());
    let report = Report::from_request(req, peer_host)?;

    // Dropping the transaction on an early return rolls it back.
    let txn = state.db.begin().await?;
    let previous = store::report(&txn, &report).await?;
    txn.commit().await?;

    Ok(Json(ReportResponse::ok(previous)))
}

async fn list_versions(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let views = projection::list_versions(state.db.as_ref()).await?;
    Ok(Json(json!({ "versions": encode_list(&views)? })))
}

async fn version_detail(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let view = projection::version_detail(state.db.as_ref(), id_of(path)?).await?;
    Ok(Json(encode(&view)?))
}

async fn list_clusters(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let listing = projection::list_clusters(state.db.as_ref()).await?;
    Ok(Json(json!({
        "clusters": encode_list(&listing.clusters)?,
        "unclustered": encode_list(&listing.unclustered)?,
    })))
}

async fn cluster_detail(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let view = projection::cluster_detail(state.db.as_ref(), id_of(path)?).await?;
    Ok(Json(encode(&view)?))
}

async fn list_hosts(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let views = projection::list_hosts(state.db.as_ref()).await?;
    Ok(Json(json!({ "hosts": encode_list(&views)? })))
}

async fn host_detail(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let view = projection::host_detail(state.db.as_ref(), id_of(path)?).await?;
    Ok(Json(encode(&view)?))
}

async fn list_applications(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let views = projection::list_applications(state.db.as_ref()).await?;
    Ok(Json(json!({ "applications": encode_list(&views)? })))
}

async fn application_detail(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let view = projection::application_detail(state.db.as_ref(), id_of(path)?).await?;
    Ok(Json(encode(&view)?))
}

async fn list_deployments(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let views = projection::list_deployments(state.db.as_ref()).await?;
    Ok(Json(json!({ "deployments": encode_list(&views)? })))
}

async fn deployment_detail(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let view = projection::deployment_detail(state.db.as_ref(), id_of(path)?).await?;
    Ok(Json(encode(&view)?))
}

async fn list_customers(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let views = projection::list_customers(state.db.as_ref()).await?;
    Ok(Json(json!({ "customers": encode_list(&views)? })))
}

async fn customer_detail(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let view = projection::customer_detail(state.db.as_ref(), id_of(path)?).await?;
    Ok(Json(encode(&view)?))
}

async fn list_releases(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let views = projection::list_releases(state.db.as_ref()).await?;
    Ok(Json(json!({ "releases": encode_list(&views)? })))
}

async fn release_detail(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let view = projection::release_detail(state.db.as_ref(), id_of(path)?).await?;
    Ok(Json(encode(&view)?))
}
