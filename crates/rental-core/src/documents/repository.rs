use crate::domain::{AccountId, DocumentId};
use crate::repository::RepositoryError;

use super::domain::Document;

/// Storage abstraction for document rows.
pub trait DocumentRepository: Send + Sync {
    fn insert(&self, document: Document) -> Result<Document, RepositoryError>;
    fn find(&self, id: DocumentId) -> Result<Option<Document>, RepositoryError>;
    fn list_all(&self) -> Result<Vec<Document>, RepositoryError>;
    fn list_for_uploader(&self, uploader: AccountId) -> Result<Vec<Document>, RepositoryError>;
}
