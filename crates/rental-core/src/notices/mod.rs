//! Broadcast notifications, optionally carrying a stored file attachment.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Attachment, NoticeDraft, NoticePriority, NoticeView, Notification};
pub use repository::NotificationRepository;
pub use router::notice_router;
pub use service::{NoticeService, NoticeServiceError};
