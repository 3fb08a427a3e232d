use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{NoticeId, PropertyId, TargetAudience, TenantOrgId};
use crate::visibility::Broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticePriority {
    Low,
    Normal,
    High,
}

impl NoticePriority {
    pub const ALL: [NoticePriority; 3] = [
        NoticePriority::Low,
        NoticePriority::Normal,
        NoticePriority::High,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            NoticePriority::Low => "low",
            NoticePriority::Normal => "normal",
            NoticePriority::High => "high",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "low" => Some(NoticePriority::Low),
            "normal" => Some(NoticePriority::Normal),
            "high" => Some(NoticePriority::High),
            _ => None,
        }
    }
}

/// A posted notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NoticeId,
    pub property_id: Option<PropertyId>,
    pub tenant_org_id: Option<TenantOrgId>,
    pub title: String,
    pub content: String,
    pub priority: NoticePriority,
    pub audience: TargetAudience,
    /// Stored filename of the optional attachment.
    pub attachment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn view(&self) -> NoticeView {
        NoticeView {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            priority: self.priority,
            target_role: self.audience,
            attachment: self.attachment.clone(),
            created_at: self.created_at,
        }
    }
}

impl Broadcast for Notification {
    fn audience(&self) -> TargetAudience {
        self.audience
    }

    fn posted_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Client-facing notification row.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeView {
    pub id: NoticeId,
    pub title: String,
    pub content: String,
    pub priority: NoticePriority,
    pub target_role: TargetAudience,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Text fields of a notification post.
#[derive(Debug, Clone)]
pub struct NoticeDraft {
    pub title: String,
    pub content: String,
    pub priority: NoticePriority,
    pub audience: TargetAudience,
}

/// An uploaded file accompanying a notification.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}
