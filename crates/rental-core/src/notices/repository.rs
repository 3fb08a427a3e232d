use crate::repository::RepositoryError;

use super::domain::Notification;

/// Storage abstraction for notifications.
pub trait NotificationRepository: Send + Sync {
    fn insert(&self, notification: Notification) -> Result<Notification, RepositoryError>;
    fn list_all(&self) -> Result<Vec<Notification>, RepositoryError>;
}
