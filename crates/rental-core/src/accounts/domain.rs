use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{AccountId, ActorAccount, Role, TenantOrgId, UnitId};

/// A person known to the system. The password hash is a PHC-format string;
/// the plaintext never reaches storage or logs.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    /// Set when an owner-role account administers an organization.
    pub tenant_org_id: Option<TenantOrgId>,
    /// Set when a tenant-role account occupies a unit.
    pub unit_id: Option<UnitId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            phone: self.phone.clone(),
            tenant_org_id: self.tenant_org_id,
            unit_id: self.unit_id,
            created_at: self.created_at,
        }
    }
}

impl From<&Account> for ActorAccount {
    fn from(account: &Account) -> Self {
        ActorAccount {
            id: account.id,
            username: account.username.clone(),
            role: account.role,
            tenant_org_id: account.tenant_org_id,
            unit_id: account.unit_id,
        }
    }
}

/// Sanitized representation safe to return to clients.
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_org_id: Option<TenantOrgId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<UnitId>,
    pub created_at: DateTime<Utc>,
}

/// Input to account registration. The HTTP surface always registers renters;
/// other roles come from seeding and fixtures.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub phone: Option<String>,
    pub tenant_org_id: Option<TenantOrgId>,
    pub unit_id: Option<UnitId>,
}

impl Registration {
    /// Renter-role registration, the shape the public form produces.
    pub fn tenant(username: &str, email: &str, password: &str, phone: Option<&str>) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Role::Tenant,
            phone: phone.map(str::to_string),
            tenant_org_id: None,
            unit_id: None,
        }
    }
}
