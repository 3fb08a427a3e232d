use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;

use crate::auth::CurrentActor;
use crate::error::ApiError;

use super::domain::PaymentRequest;
use super::repository::PaymentRepository;
use super::service::PaymentService;

/// Router exposing payment submission, history, and owner reports.
pub fn payment_router<P>(service: Arc<PaymentService<P>>) -> Router
where
    P: PaymentRepository + 'static,
{
    Router::new()
        .route(
            "/payment",
            get(payment_view_handler::<P>).post(submit_payment_handler::<P>),
        )
        .route("/reports", get(reports_handler::<P>))
        .route("/reports/export", get(export_handler::<P>))
        .with_state(service)
}

/// Form view plus the actor's own payment history.
async fn payment_view_handler<P>(
    State(service): State<Arc<PaymentService<P>>>,
    CurrentActor(actor): CurrentActor,
) -> Result<Response, ApiError>
where
    P: PaymentRepository + 'static,
{
    let history = service.ledger(&actor)?;
    let form = PaymentService::<P>::form_view(Utc::now());
    Ok(Json(json!({
        "form": form,
        "payments": history,
    }))
    .into_response())
}

async fn submit_payment_handler<P>(
    State(service): State<Arc<PaymentService<P>>>,
    CurrentActor(actor): CurrentActor,
    Json(request): Json<PaymentRequest>,
) -> Result<Response, ApiError>
where
    P: PaymentRepository + 'static,
{
    let payment = service.submit(&actor, request, Utc::now())?;
    let body = json!({
        "message": "Payment successful!",
        "redirect": "/tenant/dashboard",
        "payment": payment.view(),
    });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn reports_handler<P>(
    State(service): State<Arc<PaymentService<P>>>,
    CurrentActor(actor): CurrentActor,
) -> Result<Response, ApiError>
where
    P: PaymentRepository + 'static,
{
    let payments = service.report(&actor)?;
    Ok(Json(json!({ "payments": payments })).into_response())
}

async fn export_handler<P>(
    State(service): State<Arc<PaymentService<P>>>,
    CurrentActor(actor): CurrentActor,
) -> Result<Response, ApiError>
where
    P: PaymentRepository + 'static,
{
    let csv = service.export_csv(&actor)?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"payments.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
