use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, PropertyId, TenantOrgId, UnitId};

/// Subscription plan a business signs up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Basic,
    Pro,
    Enterprise,
}

impl SubscriptionTier {
    pub const ALL: [SubscriptionTier; 3] = [
        SubscriptionTier::Basic,
        SubscriptionTier::Pro,
        SubscriptionTier::Enterprise,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SubscriptionTier::Basic => "basic",
            SubscriptionTier::Pro => "pro",
            SubscriptionTier::Enterprise => "enterprise",
        }
    }

    /// Monthly price in whole dollars, shown on the registration form.
    pub const fn monthly_price(self) -> u32 {
        match self {
            SubscriptionTier::Basic => 29,
            SubscriptionTier::Pro => 79,
            SubscriptionTier::Enterprise => 199,
        }
    }
}

/// A business organization: the SaaS tenant that owns properties.
#[derive(Debug, Clone, Serialize)]
pub struct TenantOrg {
    pub id: TenantOrgId,
    pub business_name: String,
    pub contact_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_address: Option<String>,
    pub tier: SubscriptionTier,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A rental property, owned by exactly one organization.
#[derive(Debug, Clone, Serialize)]
pub struct Property {
    pub id: PropertyId,
    pub owner_id: TenantOrgId,
    pub name: String,
    pub address: String,
    pub total_units: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A rentable unit within a property.
#[derive(Debug, Clone, Serialize)]
pub struct Unit {
    pub id: UnitId,
    pub property_id: PropertyId,
    pub unit_number: String,
    pub apartment_number: String,
    pub is_occupied: bool,
    /// Monthly rent in cents; never negative.
    pub rent_cents: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupant_id: Option<AccountId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for business registration.
#[derive(Debug, Clone, Deserialize)]
pub struct OrgRegistration {
    pub business_name: String,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub business_address: Option<String>,
    pub subscription_plan: SubscriptionTier,
}

/// Input for adding a property.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProperty {
    pub name: String,
    pub address: String,
    pub total_units: u32,
}

/// Input for adding a unit to a property.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUnit {
    pub unit_number: String,
    pub apartment_number: String,
    /// Monthly rent in dollars as entered on the form.
    pub rent_amount: f64,
    #[serde(default)]
    pub is_occupied: bool,
}
