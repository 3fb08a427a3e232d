use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;

use crate::auth::CurrentActor;
use crate::domain::TargetAudience;
use crate::error::ApiError;
use crate::storage::FileStore;

use super::domain::{Attachment, NoticeDraft, NoticePriority};
use super::repository::NotificationRepository;
use super::service::NoticeService;

/// Router exposing the notification board.
pub fn notice_router<N, F>(service: Arc<NoticeService<N, F>>) -> Router
where
    N: NotificationRepository + 'static,
    F: FileStore + 'static,
{
    Router::new()
        .route("/notifications", get(list_handler::<N, F>))
        .route(
            "/notifications/create",
            get(create_form_handler::<N, F>).post(create_handler::<N, F>),
        )
        .with_state(service)
}

async fn list_handler<N, F>(
    State(service): State<Arc<NoticeService<N, F>>>,
    CurrentActor(actor): CurrentActor,
) -> Result<Response, ApiError>
where
    N: NotificationRepository + 'static,
    F: FileStore + 'static,
{
    let notifications = service.list(&actor)?;
    Ok(Json(json!({ "notifications": notifications })).into_response())
}

async fn create_form_handler<N, F>(
    State(service): State<Arc<NoticeService<N, F>>>,
    CurrentActor(actor): CurrentActor,
) -> Result<Response, ApiError>
where
    N: NotificationRepository + 'static,
    F: FileStore + 'static,
{
    let recent = service.recent(&actor, 3)?;
    let priorities: Vec<_> = NoticePriority::ALL
        .iter()
        .map(|priority| priority.label())
        .collect();

    Ok(Json(json!({
        "form": "create-notification",
        "fields": ["title", "content", "priority", "target_role", "file_attachment"],
        "priorities": priorities,
        "target_roles": ["all", "tenant", "owner"],
        "recent_notifications": recent,
    }))
    .into_response())
}

async fn create_handler<N, F>(
    State(service): State<Arc<NoticeService<N, F>>>,
    CurrentActor(actor): CurrentActor,
    mut multipart: Multipart,
) -> Result<Response, ApiError>
where
    N: NotificationRepository + 'static,
    F: FileStore + 'static,
{
    let mut title = None;
    let mut content = None;
    let mut priority = None;
    let mut audience = None;
    let mut attachment = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "title" => title = Some(field.text().await?),
            "content" => content = Some(field.text().await?),
            "priority" => {
                let raw = field.text().await?;
                priority = Some(
                    NoticePriority::parse(&raw)
                        .ok_or_else(|| ApiError::Validation("unknown priority".to_string()))?,
                );
            }
            "target_role" => {
                let raw = field.text().await?;
                audience = Some(
                    TargetAudience::parse(&raw)
                        .ok_or_else(|| ApiError::Validation("unknown target role".to_string()))?,
                );
            }
            "file_attachment" => {
                let filename = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                if let Some(filename) = filename {
                    if !bytes.is_empty() {
                        attachment = Some(Attachment {
                            filename,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
            }
            _ => {
                // Unknown parts are drained and ignored.
                let _ = field.bytes().await?;
            }
        }
    }

    let draft = NoticeDraft {
        title: title.ok_or_else(|| ApiError::Validation("title is required".to_string()))?,
        content: content.ok_or_else(|| ApiError::Validation("content is required".to_string()))?,
        priority: priority.unwrap_or(NoticePriority::Normal),
        audience: audience.unwrap_or(TargetAudience::Everyone),
    };

    let notification = service.post(&actor, draft, attachment, Utc::now())?;
    let body = json!({
        "message": "Notification posted successfully!",
        "redirect": "/notifications",
        "notification": notification.view(),
    });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}
