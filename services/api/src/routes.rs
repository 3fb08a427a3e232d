use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;

use rental_core::accounts::account_router;
use rental_core::auth::{actor_layer, ActorResolver, CurrentActor};
use rental_core::dashboards::dashboard_router;
use rental_core::documents::document_router;
use rental_core::domain::{Actor, Role};
use rental_core::error::ApiError;
use rental_core::maintenance::maintenance_router;
use rental_core::notices::notice_router;
use rental_core::payments::payment_router;
use rental_core::policy::{self, Action};
use rental_core::tenancy::tenancy_router;

use crate::infra::{Accounts, AppState, LocalFileStore, Services, SessionStore};

/// Assemble the full application router over the wired services.
pub(crate) fn app_router(services: &Services, max_upload_bytes: usize) -> Router {
    let resolver: Arc<dyn ActorResolver> = services.sessions.clone();

    Router::new()
        .merge(dashboard_router(services.dashboards.clone()))
        .merge(account_router(services.accounts.clone()))
        .merge(tenancy_router(services.tenancy.clone()))
        .merge(payment_router(services.payments.clone()))
        .merge(maintenance_router(services.maintenance.clone()))
        .merge(notice_router(services.notices.clone()))
        .merge(document_router(services.documents.clone()))
        .merge(session_router(
            services.accounts.clone(),
            services.sessions.clone(),
        ))
        .merge(uploads_router(services.files.clone()))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(actor_layer(resolver))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

#[derive(Clone)]
pub(crate) struct SessionState {
    accounts: Arc<Accounts>,
    sessions: Arc<SessionStore>,
}

/// Login and logout: the only handlers that touch session mechanics.
pub(crate) fn session_router(accounts: Arc<Accounts>, sessions: Arc<SessionStore>) -> Router {
    Router::new()
        .route("/login", get(login_form).post(login_handler))
        .route("/logout", get(logout_handler))
        .with_state(SessionState { accounts, sessions })
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

async fn login_form(CurrentActor(actor): CurrentActor) -> Json<serde_json::Value> {
    Json(json!({
        "form": "login",
        "fields": ["username", "password"],
        "authenticated": !matches!(actor, Actor::Anonymous),
    }))
}

async fn login_handler(
    State(state): State<SessionState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let account = state
        .accounts
        .authenticate(&request.username, &request.password)?;
    let token = state.sessions.issue(&account);

    let redirect = match account.role {
        Role::Owner => "/owner/dashboard",
        _ => "/tenant/dashboard",
    };

    Ok(Json(json!({
        "message": "Login successful!",
        "token": token,
        "redirect": redirect,
        "account": account.view(),
    }))
    .into_response())
}

async fn logout_handler(
    State(state): State<SessionState>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.revoke(token);
    }

    Json(json!({
        "message": "You have been logged out.",
        "redirect": "/login",
    }))
}

/// Notification attachments are linked by stored filename; serve them to any
/// authenticated actor from the upload directory.
pub(crate) fn uploads_router(files: Arc<LocalFileStore>) -> Router {
    Router::new()
        .route("/uploads/:filename", get(upload_file_handler))
        .with_state(files)
}

async fn upload_file_handler(
    State(files): State<Arc<LocalFileStore>>,
    CurrentActor(actor): CurrentActor,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    policy::authorize(&actor, Action::ViewNotifications, None)?;

    // Re-sanitizing keeps traversal out of the route parameter.
    let safe = rental_core::storage::sanitize_filename(&filename)
        .ok_or_else(|| ApiError::NotFound("file not found".to_string()))?;
    let bytes = files.open_named(&safe)?;

    let content_type = mime_guess::from_path(&safe).first_or_octet_stream();

    Ok((
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_str(content_type.as_ref())
                .unwrap_or(HeaderValue::from_static("application/octet-stream")),
        )],
        bytes,
    )
        .into_response())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
