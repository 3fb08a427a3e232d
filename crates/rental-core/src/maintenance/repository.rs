use chrono::{DateTime, Utc};

use crate::domain::{AccountId, RequestId};
use crate::repository::RepositoryError;

use super::domain::MaintenanceRequest;

/// Storage abstraction for maintenance requests.
pub trait MaintenanceRepository: Send + Sync {
    fn insert(&self, request: MaintenanceRequest)
        -> Result<MaintenanceRequest, RepositoryError>;
    fn find(&self, id: RequestId) -> Result<Option<MaintenanceRequest>, RepositoryError>;
    fn update(&self, request: MaintenanceRequest) -> Result<(), RepositoryError>;
    fn list_all(&self) -> Result<Vec<MaintenanceRequest>, RepositoryError>;
    /// A request by the same account with the same title created after
    /// `since`; backs the rolling duplicate guard.
    fn find_recent_with_title(
        &self,
        requester: AccountId,
        title: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<MaintenanceRequest>, RepositoryError>;
    fn count_open(&self) -> Result<usize, RepositoryError>;
}
