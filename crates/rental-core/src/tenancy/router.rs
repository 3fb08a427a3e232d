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
use crate::domain::{PropertyId, TenantOrgId};
use crate::error::ApiError;

use super::domain::{NewProperty, NewUnit, OrgRegistration, SubscriptionTier};
use super::repository::{PropertyRepository, TenantOrgRepository, UnitRepository};
use super::service::TenancyService;

/// Router exposing business registration and property management.
pub fn tenancy_router<T, P, U>(service: Arc<TenancyService<T, P, U>>) -> Router
where
    T: TenantOrgRepository + 'static,
    P: PropertyRepository + 'static,
    U: UnitRepository + 'static,
{
    Router::new()
        .route(
            "/register-tenant",
            get(register_org_form).post(register_org_handler::<T, P, U>),
        )
        .route(
            "/properties/add",
            get(add_property_form).post(add_property_handler::<T, P, U>),
        )
        .route("/properties/:id/units", post(add_unit_handler::<T, P, U>))
        .route("/dashboard/tenant/:id", get(org_dashboard_handler::<T, P, U>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddPropertyRequest {
    #[serde(flatten)]
    pub(crate) property: NewProperty,
    /// Admins may add on behalf of an org; ignored for tenant-role actors.
    #[serde(default)]
    pub(crate) tenant_org_id: Option<TenantOrgId>,
}

async fn register_org_form() -> Json<serde_json::Value> {
    let plans: Vec<_> = SubscriptionTier::ALL
        .iter()
        .map(|tier| {
            json!({
                "plan": tier.label(),
                "monthly_price": tier.monthly_price(),
            })
        })
        .collect();

    Json(json!({
        "form": "register-tenant",
        "fields": [
            "business_name",
            "contact_email",
            "contact_phone",
            "business_address",
            "subscription_plan",
        ],
        "subscription_plans": plans,
    }))
}

async fn register_org_handler<T, P, U>(
    State(service): State<Arc<TenancyService<T, P, U>>>,
    Json(registration): Json<OrgRegistration>,
) -> Result<Response, ApiError>
where
    T: TenantOrgRepository + 'static,
    P: PropertyRepository + 'static,
    U: UnitRepository + 'static,
{
    let org = service.register_org(registration, Utc::now())?;
    let body = json!({
        "message": "Business registration successful! You can now log in.",
        "redirect": "/login",
        "org": org,
    });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn add_property_form() -> Json<serde_json::Value> {
    Json(json!({
        "form": "add-property",
        "fields": ["name", "address", "total_units"],
        "total_units_range": { "min": 1, "max": 1000 },
    }))
}

async fn add_property_handler<T, P, U>(
    State(service): State<Arc<TenancyService<T, P, U>>>,
    CurrentActor(actor): CurrentActor,
    Json(request): Json<AddPropertyRequest>,
) -> Result<Response, ApiError>
where
    T: TenantOrgRepository + 'static,
    P: PropertyRepository + 'static,
    U: UnitRepository + 'static,
{
    let property = service.add_property(
        &actor,
        request.property,
        request.tenant_org_id,
        Utc::now(),
    )?;

    let body = json!({
        "message": "Property added successfully!",
        "redirect": format!("/dashboard/tenant/{}", property.owner_id),
        "property": property,
    });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn add_unit_handler<T, P, U>(
    State(service): State<Arc<TenancyService<T, P, U>>>,
    CurrentActor(actor): CurrentActor,
    Path(property_id): Path<u64>,
    Json(request): Json<NewUnit>,
) -> Result<Response, ApiError>
where
    T: TenantOrgRepository + 'static,
    P: PropertyRepository + 'static,
    U: UnitRepository + 'static,
{
    let unit = service.add_unit(&actor, PropertyId(property_id), request, Utc::now())?;
    let body = json!({
        "message": "Unit added successfully!",
        "unit": unit,
    });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn org_dashboard_handler<T, P, U>(
    State(service): State<Arc<TenancyService<T, P, U>>>,
    CurrentActor(actor): CurrentActor,
    Path(org_id): Path<u64>,
) -> Result<Response, ApiError>
where
    T: TenantOrgRepository + 'static,
    P: PropertyRepository + 'static,
    U: UnitRepository + 'static,
{
    let dashboard = service.org_dashboard(&actor, TenantOrgId(org_id))?;
    Ok(Json(dashboard).into_response())
}
