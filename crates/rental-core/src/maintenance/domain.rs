use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, PropertyId, RequestId, UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestCategory {
    Plumbing,
    Electrical,
    Hvac,
    Appliance,
    General,
}

impl RequestCategory {
    pub const ALL: [RequestCategory; 5] = [
        RequestCategory::Plumbing,
        RequestCategory::Electrical,
        RequestCategory::Hvac,
        RequestCategory::Appliance,
        RequestCategory::General,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RequestCategory::Plumbing => "plumbing",
            RequestCategory::Electrical => "electrical",
            RequestCategory::Hvac => "hvac",
            RequestCategory::Appliance => "appliance",
            RequestCategory::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestPriority {
    Low,
    Medium,
    High,
}

impl RequestPriority {
    pub const ALL: [RequestPriority; 3] = [
        RequestPriority::Low,
        RequestPriority::Medium,
        RequestPriority::High,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RequestPriority::Low => "low",
            RequestPriority::Medium => "medium",
            RequestPriority::High => "high",
        }
    }
}

/// Lifecycle state. `resolved_at` on the request is set exactly when the
/// status is `Completed`, and cleared on any transition away from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Open,
    InProgress,
    Completed,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Open => "open",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "open" => Some(RequestStatus::Open),
            "in_progress" => Some(RequestStatus::InProgress),
            "completed" => Some(RequestStatus::Completed),
            _ => None,
        }
    }
}

/// A maintenance ticket filed by a renter.
#[derive(Debug, Clone)]
pub struct MaintenanceRequest {
    pub id: RequestId,
    pub requester_id: AccountId,
    pub unit_id: Option<UnitId>,
    pub property_id: Option<PropertyId>,
    pub title: String,
    pub description: String,
    pub category: RequestCategory,
    pub priority: RequestPriority,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl MaintenanceRequest {
    pub fn view(&self) -> RequestView {
        RequestView {
            id: self.id,
            requester_id: self.requester_id,
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            priority: self.priority,
            status: self.status,
            created_at: self.created_at,
            resolved_at: self.resolved_at,
        }
    }
}

/// Client-facing ticket row.
#[derive(Debug, Clone, Serialize)]
pub struct RequestView {
    pub id: RequestId,
    pub requester_id: AccountId,
    pub title: String,
    pub description: String,
    pub category: RequestCategory,
    pub priority: RequestPriority,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Input to `CreateMaintenanceRequest`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRequest {
    pub title: String,
    pub description: String,
    pub category: RequestCategory,
    pub priority: RequestPriority,
}
