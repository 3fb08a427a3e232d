use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;

use crate::auth::CurrentActor;
use crate::domain::{DocumentId, TargetAudience};
use crate::error::ApiError;
use crate::storage::FileStore;

use super::domain::DocumentUpload;
use super::repository::DocumentRepository;
use super::service::{DocumentService, ALLOWED_EXTENSIONS};

/// Router exposing the shared document library.
pub fn document_router<D, F>(service: Arc<DocumentService<D, F>>) -> Router
where
    D: DocumentRepository + 'static,
    F: FileStore + 'static,
{
    Router::new()
        .route("/documents", get(list_handler::<D, F>))
        .route(
            "/documents/upload",
            get(upload_form_handler::<D, F>).post(upload_handler::<D, F>),
        )
        .route("/documents/:id/download", get(download_handler::<D, F>))
        .with_state(service)
}

async fn list_handler<D, F>(
    State(service): State<Arc<DocumentService<D, F>>>,
    CurrentActor(actor): CurrentActor,
) -> Result<Response, ApiError>
where
    D: DocumentRepository + 'static,
    F: FileStore + 'static,
{
    let documents = service.list(&actor)?;
    Ok(Json(json!({ "documents": documents })).into_response())
}

async fn upload_form_handler<D, F>(
    State(service): State<Arc<DocumentService<D, F>>>,
    CurrentActor(actor): CurrentActor,
) -> Result<Response, ApiError>
where
    D: DocumentRepository + 'static,
    F: FileStore + 'static,
{
    let recent = service.recent_uploads(&actor, 3)?;
    Ok(Json(json!({
        "form": "upload-document",
        "fields": ["title", "file", "target_role"],
        "allowed_extensions": ALLOWED_EXTENSIONS,
        "target_roles": ["all", "tenant", "owner"],
        "recent_documents": recent,
    }))
    .into_response())
}

async fn upload_handler<D, F>(
    State(service): State<Arc<DocumentService<D, F>>>,
    CurrentActor(actor): CurrentActor,
    mut multipart: Multipart,
) -> Result<Response, ApiError>
where
    D: DocumentRepository + 'static,
    F: FileStore + 'static,
{
    let mut title = None;
    let mut audience = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "title" => title = Some(field.text().await?),
            "target_role" => {
                let raw = field.text().await?;
                audience = Some(
                    TargetAudience::parse(&raw)
                        .ok_or_else(|| ApiError::Validation("unknown target role".to_string()))?,
                );
            }
            "file" => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                if let Some(filename) = filename {
                    file = Some((filename, content_type, bytes.to_vec()));
                }
            }
            _ => {
                let _ = field.bytes().await?;
            }
        }
    }

    let (filename, content_type, bytes) = file
        .ok_or_else(|| ApiError::Validation("please select a file to upload".to_string()))?;

    let upload = DocumentUpload {
        title: title.ok_or_else(|| ApiError::Validation("title is required".to_string()))?,
        filename,
        content_type,
        audience: audience.unwrap_or(TargetAudience::Everyone),
        bytes,
    };

    let document = service.upload(&actor, upload, Utc::now())?;
    let body = json!({
        "message": "Document uploaded successfully!",
        "redirect": "/documents",
        "document": document.view(),
    });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn download_handler<D, F>(
    State(service): State<Arc<DocumentService<D, F>>>,
    CurrentActor(actor): CurrentActor,
    Path(document_id): Path<u64>,
) -> Result<Response, ApiError>
where
    D: DocumentRepository + 'static,
    F: FileStore + 'static,
{
    let download = service.download(&actor, DocumentId(document_id))?;

    let content_type = download
        .document
        .file_type
        .parse::<mime::Mime>()
        .unwrap_or(mime::APPLICATION_OCTET_STREAM);

    let disposition = format!(
        "attachment; filename=\"{}\"",
        download.document.filename
    );

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_str(content_type.as_ref())
                    .unwrap_or(HeaderValue::from_static("application/octet-stream")),
            ),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_str(&disposition)
                    .unwrap_or(HeaderValue::from_static("attachment")),
            ),
        ],
        download.bytes,
    )
        .into_response())
}
