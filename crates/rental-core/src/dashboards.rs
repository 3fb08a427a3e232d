//! Role-gated dashboards and the root redirect.
//!
//! Read-only composition over the other modules' gateways: the owner
//! dashboard aggregates counts and recent completed payments, the tenant
//! dashboard shows the renter their own payments and visible notifications.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;

use crate::accounts::repository::AccountRepository;
use crate::auth::CurrentActor;
use crate::domain::{Actor, Role};
use crate::error::ApiError;
use crate::maintenance::repository::MaintenanceRepository;
use crate::notices::domain::{NoticeView, Notification};
use crate::notices::repository::NotificationRepository;
use crate::payments::domain::{Payment, PaymentStatus, PaymentView};
use crate::payments::repository::PaymentRepository;
use crate::policy::{self, Action};
use crate::visibility;

const RECENT_LIMIT: usize = 5;

/// Read-only service backing the dashboard views.
pub struct DashboardService<A, P, M, N> {
    accounts: Arc<A>,
    payments: Arc<P>,
    maintenance: Arc<M>,
    notices: Arc<N>,
}

#[derive(Debug, Serialize)]
pub struct OwnerDashboard {
    pub total_tenants: usize,
    pub completed_payments: usize,
    pub open_requests: usize,
    pub recent_payments: Vec<PaymentView>,
}

#[derive(Debug, Serialize)]
pub struct TenantDashboard {
    pub payments: Vec<PaymentView>,
    pub notifications: Vec<NoticeView>,
}

impl<A, P, M, N> DashboardService<A, P, M, N>
where
    A: AccountRepository + 'static,
    P: PaymentRepository + 'static,
    M: MaintenanceRepository + 'static,
    N: NotificationRepository + 'static,
{
    pub fn new(accounts: Arc<A>, payments: Arc<P>, maintenance: Arc<M>, notices: Arc<N>) -> Self {
        Self {
            accounts,
            payments,
            maintenance,
            notices,
        }
    }

    pub fn owner_dashboard(&self, actor: &Actor) -> Result<OwnerDashboard, ApiError> {
        policy::authorize(actor, Action::ViewOwnerDashboard, None)?;

        let total_tenants = self.accounts.count_with_role(Role::Tenant)?;
        let completed_payments = self.payments.count_completed()?;
        let open_requests = self.maintenance.count_open()?;

        let mut completed: Vec<Payment> = self
            .payments
            .list_all()?
            .into_iter()
            .filter(|payment| payment.status == PaymentStatus::Completed)
            .collect();
        completed.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
        completed.truncate(RECENT_LIMIT);

        Ok(OwnerDashboard {
            total_tenants,
            completed_payments,
            open_requests,
            recent_payments: completed.iter().map(Payment::view).collect(),
        })
    }

    pub fn tenant_dashboard(&self, actor: &Actor) -> Result<TenantDashboard, ApiError> {
        let account = policy::authorized_account(actor, Action::ViewTenantDashboard, None)?;

        let mut own = self.payments.list_for_payer(account.id)?;
        own.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
        own.truncate(RECENT_LIMIT);

        let rows = self.notices.list_all()?;
        let mut notifications: Vec<NoticeView> = visibility::visible_rows(actor, &rows)
            .into_iter()
            .map(Notification::view)
            .collect();
        notifications.truncate(RECENT_LIMIT);

        Ok(TenantDashboard {
            payments: own.iter().map(Payment::view).collect(),
            notifications,
        })
    }
}

/// Router for `/` and the two role dashboards.
pub fn dashboard_router<A, P, M, N>(service: Arc<DashboardService<A, P, M, N>>) -> Router
where
    A: AccountRepository + 'static,
    P: PaymentRepository + 'static,
    M: MaintenanceRepository + 'static,
    N: NotificationRepository + 'static,
{
    Router::new()
        .route("/", get(index_handler))
        .route("/owner/dashboard", get(owner_handler::<A, P, M, N>))
        .route("/tenant/dashboard", get(tenant_handler::<A, P, M, N>))
        .with_state(service)
}

/// Role-based redirect target, mirroring the landing behavior of the form UI.
async fn index_handler(CurrentActor(actor): CurrentActor) -> Redirect {
    match actor.role() {
        Some(Role::Owner) => Redirect::to("/owner/dashboard"),
        Some(_) => Redirect::to("/tenant/dashboard"),
        None => Redirect::to("/login"),
    }
}

async fn owner_handler<A, P, M, N>(
    State(service): State<Arc<DashboardService<A, P, M, N>>>,
    CurrentActor(actor): CurrentActor,
) -> Result<Response, ApiError>
where
    A: AccountRepository + 'static,
    P: PaymentRepository + 'static,
    M: MaintenanceRepository + 'static,
    N: NotificationRepository + 'static,
{
    let dashboard = service.owner_dashboard(&actor)?;
    Ok(Json(json!(dashboard)).into_response())
}

async fn tenant_handler<A, P, M, N>(
    State(service): State<Arc<DashboardService<A, P, M, N>>>,
    CurrentActor(actor): CurrentActor,
) -> Result<Response, ApiError>
where
    A: AccountRepository + 'static,
    P: PaymentRepository + 'static,
    M: MaintenanceRepository + 'static,
    N: NotificationRepository + 'static,
{
    let dashboard = service.tenant_dashboard(&actor)?;
    Ok(Json(json!(dashboard)).into_response())
}
