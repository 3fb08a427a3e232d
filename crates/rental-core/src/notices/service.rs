use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{Actor, NoticeId};
use crate::error::ApiError;
use crate::policy::{self, AccessDenied, Action};
use crate::repository::RepositoryError;
use crate::storage::{self, FileStore, StorageError};
use crate::visibility;

use super::domain::{Attachment, NoticeDraft, NoticeView, Notification};
use super::repository::NotificationRepository;

static NOTICE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Service coupling notification rows with their stored attachments.
pub struct NoticeService<N, F> {
    notices: Arc<N>,
    files: Arc<F>,
}

impl<N, F> NoticeService<N, F>
where
    N: NotificationRepository + 'static,
    F: FileStore + 'static,
{
    pub fn new(notices: Arc<N>, files: Arc<F>) -> Self {
        Self { notices, files }
    }

    /// Post a notification. Owner only.
    ///
    /// When an attachment is present it is persisted first; a storage failure
    /// aborts the whole operation and no notification row is written. The two
    /// writes are one logical transaction even though the file lives outside
    /// the relational store.
    pub fn post(
        &self,
        actor: &Actor,
        draft: NoticeDraft,
        attachment: Option<Attachment>,
        now: DateTime<Utc>,
    ) -> Result<Notification, NoticeServiceError> {
        let account = policy::authorized_account(actor, Action::CreateNotification, None)?;

        let title = draft.title.trim().to_string();
        if title.is_empty() || title.len() > 200 {
            return Err(NoticeServiceError::InvalidTitle);
        }
        if draft.content.trim().is_empty() {
            return Err(NoticeServiceError::MissingContent);
        }

        let stored_attachment = match attachment {
            Some(upload) => {
                let filename = storage::sanitize_filename(&upload.filename)
                    .ok_or(NoticeServiceError::InvalidFilename)?;
                let stored = self.files.save(&filename, &upload.bytes)?;
                info!(filename = %stored.filename, "notification attachment stored");
                Some(stored.filename)
            }
            None => None,
        };

        let notification = Notification {
            id: NoticeId(NOTICE_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            property_id: None,
            tenant_org_id: account.tenant_org_id,
            title,
            content: draft.content.trim().to_string(),
            priority: draft.priority,
            audience: draft.audience,
            attachment: stored_attachment,
            created_at: now,
        };

        let stored = self.notices.insert(notification)?;
        info!(
            actor = %account.username,
            title = %stored.title,
            audience = stored.audience.label(),
            "notification posted"
        );
        Ok(stored)
    }

    /// Notifications the actor may see, newest first.
    pub fn list(&self, actor: &Actor) -> Result<Vec<NoticeView>, NoticeServiceError> {
        policy::authorize(actor, Action::ViewNotifications, None)?;
        let rows = self.notices.list_all()?;
        Ok(visibility::visible_rows(actor, &rows)
            .into_iter()
            .map(Notification::view)
            .collect())
    }

    /// The most recent posts, shown alongside the create form.
    pub fn recent(
        &self,
        actor: &Actor,
        limit: usize,
    ) -> Result<Vec<NoticeView>, NoticeServiceError> {
        policy::authorize(actor, Action::CreateNotification, None)?;
        let rows = self.notices.list_all()?;
        let mut views: Vec<NoticeView> = visibility::visible_rows(actor, &rows)
            .into_iter()
            .map(Notification::view)
            .collect();
        views.truncate(limit);
        Ok(views)
    }
}

/// Error raised by the notice service.
#[derive(Debug, thiserror::Error)]
pub enum NoticeServiceError {
    #[error("title must be between 1 and 200 characters")]
    InvalidTitle,
    #[error("content must not be empty")]
    MissingContent,
    #[error("invalid filename")]
    InvalidFilename,
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<NoticeServiceError> for ApiError {
    fn from(value: NoticeServiceError) -> Self {
        match value {
            NoticeServiceError::InvalidTitle
            | NoticeServiceError::MissingContent
            | NoticeServiceError::InvalidFilename => ApiError::Validation(value.to_string()),
            NoticeServiceError::Denied(denied) => ApiError::Denied(denied),
            NoticeServiceError::Storage(err) => err.into(),
            NoticeServiceError::Repository(err) => err.into(),
        }
    }
}
