use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{AccountId, DocumentId, PropertyId, TargetAudience, TenantOrgId};
use crate::visibility::Broadcast;

/// A stored document row. The bytes live behind the file store; this row
/// records where and for whom.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub property_id: Option<PropertyId>,
    pub tenant_org_id: Option<TenantOrgId>,
    pub title: String,
    /// Sanitized filename presented on download.
    pub filename: String,
    /// Backend path inside the file store.
    pub path: String,
    pub file_type: String,
    pub uploaded_by: AccountId,
    pub audience: TargetAudience,
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    pub fn view(&self) -> DocumentView {
        DocumentView {
            id: self.id,
            title: self.title.clone(),
            filename: self.filename.clone(),
            file_type: self.file_type.clone(),
            uploaded_by: self.uploaded_by,
            target_role: self.audience,
            uploaded_at: self.uploaded_at,
        }
    }
}

impl Broadcast for Document {
    fn audience(&self) -> TargetAudience {
        self.audience
    }

    fn posted_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }
}

/// Client-facing document row; the storage path stays private.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    pub id: DocumentId,
    pub title: String,
    pub filename: String,
    pub file_type: String,
    pub uploaded_by: AccountId,
    pub target_role: TargetAudience,
    pub uploaded_at: DateTime<Utc>,
}

/// Input to `UploadDocument`.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub title: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub audience: TargetAudience,
    pub bytes: Vec<u8>,
}

/// A document row together with its bytes, ready to serve.
#[derive(Debug)]
pub struct DocumentDownload {
    pub document: Document,
    pub bytes: Vec<u8>,
}
