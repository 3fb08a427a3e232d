//! File-storage seam.
//!
//! The core never touches the filesystem directly: attachments and documents
//! go through [`FileStore`], and the service crate decides what backs it.
//! Filenames are sanitized before they reach the store so a hostile upload
//! name cannot escape the upload directory.

use serde::Serialize;

/// Storage abstraction for uploaded files.
pub trait FileStore: Send + Sync {
    /// Persist `bytes` under `filename`, returning where it landed.
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<StoredFile, StorageError>;
    /// Read a previously stored file back.
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError>;
    fn exists(&self, path: &str) -> bool;
}

/// Location of a stored file: the sanitized name plus the backend path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    pub filename: String,
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("file missing: {0}")]
    Missing(String),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Reduce an uploaded filename to a safe basename.
///
/// Path components are stripped, whitespace becomes underscores, and anything
/// outside `[A-Za-z0-9._-]` is dropped. Returns `None` when nothing safe
/// remains (the caller treats that as a validation failure).
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let basename = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let mut cleaned = String::with_capacity(basename.len());
    for ch in basename.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
            cleaned.push(ch);
        } else if ch.is_whitespace() {
            cleaned.push('_');
        }
    }

    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '_').to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Lowercased extension of a filename, without the dot.
pub fn file_extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(
            sanitize_filename("../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(
            sanitize_filename("C:\\uploads\\lease.pdf").as_deref(),
            Some("lease.pdf")
        );
    }

    #[test]
    fn sanitize_replaces_spaces_and_drops_specials() {
        assert_eq!(
            sanitize_filename("March rent (final).pdf").as_deref(),
            Some("March_rent_final.pdf")
        );
    }

    #[test]
    fn sanitize_rejects_names_with_no_safe_characters() {
        assert_eq!(sanitize_filename("../.."), None);
        assert_eq!(sanitize_filename("???"), None);
        assert_eq!(sanitize_filename(""), None);
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(file_extension("Lease.PDF").as_deref(), Some("pdf"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("no_extension"), None);
        assert_eq!(file_extension(".hidden"), None);
    }
}
