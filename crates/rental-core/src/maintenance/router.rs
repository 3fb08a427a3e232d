use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::auth::CurrentActor;
use crate::domain::RequestId;
use crate::error::ApiError;

use super::domain::{NewRequest, RequestCategory, RequestPriority};
use super::repository::MaintenanceRepository;
use super::service::MaintenanceService;

/// Router exposing the maintenance queue.
pub fn maintenance_router<M>(service: Arc<MaintenanceService<M>>) -> Router
where
    M: MaintenanceRepository + 'static,
{
    Router::new()
        .route("/maintenance", get(list_handler::<M>))
        .route(
            "/maintenance/create",
            get(create_form).post(create_handler::<M>),
        )
        .route("/maintenance/:id/update", post(update_handler::<M>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateStatusRequest {
    pub(crate) status: String,
}

async fn list_handler<M>(
    State(service): State<Arc<MaintenanceService<M>>>,
    CurrentActor(actor): CurrentActor,
) -> Result<Response, ApiError>
where
    M: MaintenanceRepository + 'static,
{
    let requests = service.list(&actor)?;
    Ok(Json(json!({ "requests": requests })).into_response())
}

async fn create_form() -> Json<serde_json::Value> {
    let categories: Vec<_> = RequestCategory::ALL
        .iter()
        .map(|category| category.label())
        .collect();
    let priorities: Vec<_> = RequestPriority::ALL
        .iter()
        .map(|priority| priority.label())
        .collect();

    Json(json!({
        "form": "create-maintenance-request",
        "fields": ["title", "description", "category", "priority"],
        "categories": categories,
        "priorities": priorities,
    }))
}

async fn create_handler<M>(
    State(service): State<Arc<MaintenanceService<M>>>,
    CurrentActor(actor): CurrentActor,
    Json(request): Json<NewRequest>,
) -> Result<Response, ApiError>
where
    M: MaintenanceRepository + 'static,
{
    let ticket = service.submit(&actor, request, Utc::now())?;
    let body = json!({
        "message": "Maintenance request submitted successfully!",
        "redirect": "/maintenance",
        "request": ticket.view(),
    });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn update_handler<M>(
    State(service): State<Arc<MaintenanceService<M>>>,
    CurrentActor(actor): CurrentActor,
    Path(request_id): Path<u64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Response, ApiError>
where
    M: MaintenanceRepository + 'static,
{
    let ticket = service.update_status(
        &actor,
        RequestId(request_id),
        &request.status,
        Utc::now(),
    )?;
    let body = json!({
        "message": "Maintenance request updated successfully!",
        "redirect": "/maintenance",
        "request": ticket.view(),
    });
    Ok(Json(body).into_response())
}
