use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::{Actor, DocumentId, Role, TargetAudience};
use crate::error::ApiError;
use crate::policy::{self, AccessDenied, Action, DenyReason};
use crate::repository::RepositoryError;
use crate::storage::{self, FileStore, StorageError};
use crate::visibility;

use super::domain::{Document, DocumentDownload, DocumentUpload, DocumentView};
use super::repository::DocumentRepository;

static DOCUMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Extensions accepted for upload. Everything else is refused before any
/// byte reaches the file store.
pub const ALLOWED_EXTENSIONS: [&str; 9] = [
    "pdf", "doc", "docx", "xls", "xlsx", "jpg", "jpeg", "png", "gif",
];

/// Service coupling document rows with their stored bytes.
pub struct DocumentService<D, F> {
    documents: Arc<D>,
    files: Arc<F>,
}

impl<D, F> DocumentService<D, F>
where
    D: DocumentRepository + 'static,
    F: FileStore + 'static,
{
    pub fn new(documents: Arc<D>, files: Arc<F>) -> Self {
        Self { documents, files }
    }

    /// Store a document: extension check, filename sanitizing, file write,
    /// then the row. A storage failure aborts before the row exists.
    pub fn upload(
        &self,
        actor: &Actor,
        upload: DocumentUpload,
        now: DateTime<Utc>,
    ) -> Result<Document, DocumentServiceError> {
        let account = policy::authorized_account(actor, Action::UploadDocument, None)?;

        let title = upload.title.trim().to_string();
        if title.is_empty() || title.len() > 200 {
            return Err(DocumentServiceError::InvalidTitle);
        }

        let filename = storage::sanitize_filename(&upload.filename)
            .ok_or(DocumentServiceError::InvalidFilename)?;

        let extension =
            storage::file_extension(&filename).ok_or(DocumentServiceError::UnsupportedFileType)?;
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(DocumentServiceError::UnsupportedFileType);
        }

        let stored = self.files.save(&filename, &upload.bytes)?;

        let document = Document {
            id: DocumentId(DOCUMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            property_id: None,
            tenant_org_id: account.tenant_org_id,
            title,
            filename: stored.filename,
            path: stored.path,
            file_type: upload
                .content_type
                .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string()),
            uploaded_by: account.id,
            audience: upload.audience,
            uploaded_at: now,
        };

        let row = self.documents.insert(document)?;
        info!(
            actor = %account.username,
            filename = %row.filename,
            "document uploaded"
        );
        Ok(row)
    }

    /// Fetch a document's bytes for download.
    ///
    /// Tenants are refused owner-only documents; owners and admins are always
    /// permitted. A missing backing file is a not-found outcome, kept
    /// distinct from the authorization failure.
    pub fn download(
        &self,
        actor: &Actor,
        id: DocumentId,
    ) -> Result<DocumentDownload, DocumentServiceError> {
        let account = policy::authorized_account(actor, Action::DownloadDocument, None)?;

        let document = self
            .documents
            .find(id)?
            .ok_or(DocumentServiceError::NotFound)?;

        if account.role == Role::Tenant && document.audience == TargetAudience::Owner {
            warn!(
                actor = %account.username,
                document = %id,
                "document download denied"
            );
            return Err(DocumentServiceError::Denied(AccessDenied {
                action: Action::DownloadDocument,
                reason: DenyReason::NotResourceOwner,
            }));
        }

        let bytes = self.files.read(&document.path)?;
        info!(actor = %account.username, document = %id, "document downloaded");
        Ok(DocumentDownload { document, bytes })
    }

    /// Documents the actor may see, newest first.
    pub fn list(&self, actor: &Actor) -> Result<Vec<DocumentView>, DocumentServiceError> {
        policy::authorize(actor, Action::ViewDocuments, None)?;
        let rows = self.documents.list_all()?;
        Ok(visibility::visible_rows(actor, &rows)
            .into_iter()
            .map(Document::view)
            .collect())
    }

    /// The actor's own most recent uploads, shown alongside the upload form.
    pub fn recent_uploads(
        &self,
        actor: &Actor,
        limit: usize,
    ) -> Result<Vec<DocumentView>, DocumentServiceError> {
        let account = policy::authorized_account(actor, Action::ViewDocuments, None)?;
        let mut rows = self.documents.list_for_uploader(account.id)?;
        rows.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        rows.truncate(limit);
        Ok(rows.iter().map(Document::view).collect())
    }
}

/// Error raised by the document service.
#[derive(Debug, thiserror::Error)]
pub enum DocumentServiceError {
    #[error("title must be between 1 and 200 characters")]
    InvalidTitle,
    #[error("invalid filename")]
    InvalidFilename,
    #[error("file type not allowed; allowed types: pdf, doc, docx, xls, xlsx, jpg, jpeg, png, gif")]
    UnsupportedFileType,
    #[error("document not found")]
    NotFound,
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<DocumentServiceError> for ApiError {
    fn from(value: DocumentServiceError) -> Self {
        match value {
            DocumentServiceError::InvalidTitle
            | DocumentServiceError::InvalidFilename
            | DocumentServiceError::UnsupportedFileType => ApiError::Validation(value.to_string()),
            DocumentServiceError::NotFound => ApiError::NotFound(value.to_string()),
            DocumentServiceError::Denied(denied) => ApiError::Denied(denied),
            DocumentServiceError::Storage(err) => err.into(),
            DocumentServiceError::Repository(err) => err.into(),
        }
    }
}
