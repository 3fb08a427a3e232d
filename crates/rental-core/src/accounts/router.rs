use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::auth::CurrentActor;
use crate::domain::Actor;
use crate::error::ApiError;

use super::credentials::CredentialHasher;
use super::domain::Registration;
use super::repository::AccountRepository;
use super::service::AccountService;

/// Router exposing the public account registration flow.
pub fn account_router<R, H>(service: Arc<AccountService<R, H>>) -> Router
where
    R: AccountRepository + 'static,
    H: CredentialHasher + 'static,
{
    Router::new()
        .route("/register", get(register_form).post(register_handler::<R, H>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) confirm_password: String,
    #[serde(default)]
    pub(crate) phone: Option<String>,
}

async fn register_form(CurrentActor(actor): CurrentActor) -> Response {
    if !matches!(actor, Actor::Anonymous) {
        return Json(json!({ "redirect": "/" })).into_response();
    }

    Json(json!({
        "form": "register",
        "fields": ["username", "email", "password", "confirm_password", "phone"],
    }))
    .into_response()
}

async fn register_handler<R, H>(
    State(service): State<Arc<AccountService<R, H>>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, ApiError>
where
    R: AccountRepository + 'static,
    H: CredentialHasher + 'static,
{
    if request.password != request.confirm_password {
        return Err(ApiError::Validation("passwords do not match".to_string()));
    }

    let account = service.register(
        Registration::tenant(
            &request.username,
            &request.email,
            &request.password,
            request.phone.as_deref(),
        ),
        Utc::now(),
    )?;

    let body = json!({
        "message": "Registration successful! You can now log in.",
        "redirect": "/login",
        "account": account.view(),
    });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}
