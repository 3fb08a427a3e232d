//! Shared documents: uploads gated by an extension allow-list, downloads
//! gated by the audience tag.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Document, DocumentDownload, DocumentUpload, DocumentView};
pub use repository::DocumentRepository;
pub use router::document_router;
pub use service::{DocumentService, DocumentServiceError, ALLOWED_EXTENSIONS};
