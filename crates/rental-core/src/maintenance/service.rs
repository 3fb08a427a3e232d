use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::domain::{Actor, RequestId};
use crate::error::ApiError;
use crate::policy::{self, AccessDenied, Action};
use crate::repository::RepositoryError;
use crate::visibility;

use super::domain::{MaintenanceRequest, NewRequest, RequestStatus, RequestView};
use super::repository::MaintenanceRepository;

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

const DUPLICATE_WINDOW_HOURS: i64 = 24;

/// Service owning the maintenance ticket lifecycle.
pub struct MaintenanceService<M> {
    requests: Arc<M>,
}

impl<M> MaintenanceService<M>
where
    M: MaintenanceRepository + 'static,
{
    pub fn new(requests: Arc<M>) -> Self {
        Self { requests }
    }

    /// File a new ticket.
    ///
    /// Duplicate guard: an identical title from the same requester inside the
    /// rolling 24-hour window is refused without inserting. Read-then-write,
    /// so a concurrent double-submit is tolerated, not prevented.
    pub fn submit(
        &self,
        actor: &Actor,
        request: NewRequest,
        now: DateTime<Utc>,
    ) -> Result<MaintenanceRequest, MaintenanceServiceError> {
        let account = policy::authorized_account(actor, Action::CreateMaintenanceRequest, None)?;

        let title = request.title.trim().to_string();
        if title.is_empty() || title.len() > 200 {
            return Err(MaintenanceServiceError::InvalidTitle);
        }
        if request.description.trim().is_empty() {
            return Err(MaintenanceServiceError::MissingDescription);
        }

        let window_start = now - Duration::hours(DUPLICATE_WINDOW_HOURS);
        if self
            .requests
            .find_recent_with_title(account.id, &title, window_start)?
            .is_some()
        {
            return Err(MaintenanceServiceError::DuplicateRequest);
        }

        let ticket = MaintenanceRequest {
            id: RequestId(REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            requester_id: account.id,
            unit_id: account.unit_id,
            property_id: None,
            title,
            description: request.description.trim().to_string(),
            category: request.category,
            priority: request.priority,
            status: RequestStatus::Open,
            created_at: now,
            resolved_at: None,
        };

        let stored = self.requests.insert(ticket)?;
        info!(
            requester = %account.username,
            title = %stored.title,
            "maintenance request created"
        );
        Ok(stored)
    }

    /// Move a ticket through its lifecycle. Owner/admin only.
    ///
    /// `raw_status` comes straight off the form; anything outside the three
    /// known states is rejected before the row is touched. The resolution
    /// stamp tracks the status: set on entering `Completed`, cleared on
    /// leaving it.
    pub fn update_status(
        &self,
        actor: &Actor,
        request_id: RequestId,
        raw_status: &str,
        now: DateTime<Utc>,
    ) -> Result<MaintenanceRequest, MaintenanceServiceError> {
        policy::authorize(actor, Action::UpdateMaintenanceStatus, None)?;

        let new_status =
            RequestStatus::parse(raw_status).ok_or(MaintenanceServiceError::InvalidStatus)?;

        let mut ticket = self
            .requests
            .find(request_id)?
            .ok_or(MaintenanceServiceError::NotFound)?;

        ticket.status = new_status;
        ticket.resolved_at = match new_status {
            RequestStatus::Completed => Some(now),
            _ => None,
        };

        self.requests.update(ticket.clone())?;
        info!(
            actor = actor.identity_label(),
            request = %request_id,
            status = new_status.label(),
            "maintenance request updated"
        );
        Ok(ticket)
    }

    /// Tickets the actor may see: requester-private for tenants, the full
    /// queue for owners and admins.
    pub fn list(&self, actor: &Actor) -> Result<Vec<RequestView>, MaintenanceServiceError> {
        policy::authorize(actor, Action::ViewMaintenance, None)?;
        let rows = self.requests.list_all()?;
        Ok(visibility::visible_requests(actor, &rows)
            .into_iter()
            .map(MaintenanceRequest::view)
            .collect())
    }
}

/// Error raised by the maintenance service.
#[derive(Debug, thiserror::Error)]
pub enum MaintenanceServiceError {
    #[error("title must be between 1 and 200 characters")]
    InvalidTitle,
    #[error("description must not be empty")]
    MissingDescription,
    #[error("a similar maintenance request was recently submitted")]
    DuplicateRequest,
    #[error("invalid status provided")]
    InvalidStatus,
    #[error("maintenance request not found")]
    NotFound,
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<MaintenanceServiceError> for ApiError {
    fn from(value: MaintenanceServiceError) -> Self {
        match value {
            MaintenanceServiceError::InvalidTitle
            | MaintenanceServiceError::MissingDescription
            | MaintenanceServiceError::InvalidStatus => ApiError::Validation(value.to_string()),
            MaintenanceServiceError::DuplicateRequest => ApiError::Duplicate(value.to_string()),
            MaintenanceServiceError::NotFound => ApiError::NotFound(value.to_string()),
            MaintenanceServiceError::Denied(denied) => ApiError::Denied(denied),
            MaintenanceServiceError::Repository(err) => err.into(),
        }
    }
}
