//! Shared identity and role model.
//!
//! Every relation in the system is id-based: records reference each other by
//! these newtype identifiers and read paths resolve them through the
//! repository traits on demand. There is no object graph to keep consistent.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier for a person's account, regardless of role.
    AccountId
);
id_type!(
    /// Identifier for a business organization (the SaaS tenant).
    TenantOrgId
);
id_type!(PropertyId);
id_type!(UnitId);
id_type!(PaymentId);
id_type!(
    /// Identifier for a maintenance request.
    RequestId
);
id_type!(NoticeId);
id_type!(DocumentId);

/// Role held by an account. Exactly one per account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Tenant,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Tenant => "tenant",
            Role::Admin => "admin",
        }
    }
}

/// Audience tag on broadcast content (notifications, documents).
///
/// The storage schema this grew out of used a nullable column where null meant
/// "everyone"; the tri-state is modeled explicitly here so no caller has to
/// remember what absence means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetAudience {
    Owner,
    Tenant,
    #[serde(rename = "all")]
    Everyone,
}

impl TargetAudience {
    pub const fn label(self) -> &'static str {
        match self {
            TargetAudience::Owner => "owner",
            TargetAudience::Tenant => "tenant",
            TargetAudience::Everyone => "all",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "owner" => Some(TargetAudience::Owner),
            "tenant" => Some(TargetAudience::Tenant),
            "all" => Some(TargetAudience::Everyone),
            _ => None,
        }
    }
}

/// Calendar month used for rent-payment bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Authenticated account context threaded through policy checks and domain
/// operations. Never ambient: handlers extract it from the request and pass
/// it down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorAccount {
    pub id: AccountId,
    pub username: String,
    pub role: Role,
    pub tenant_org_id: Option<TenantOrgId>,
    pub unit_id: Option<UnitId>,
}

/// The caller of an operation: either an authenticated account or nobody.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    Account(ActorAccount),
}

impl Actor {
    pub fn role(&self) -> Option<Role> {
        match self {
            Actor::Anonymous => None,
            Actor::Account(account) => Some(account.role),
        }
    }

    pub fn account(&self) -> Option<&ActorAccount> {
        match self {
            Actor::Anonymous => None,
            Actor::Account(account) => Some(account),
        }
    }

    /// Identity string used in audit logs.
    pub fn identity_label(&self) -> &str {
        match self {
            Actor::Anonymous => "anonymous",
            Actor::Account(account) => account.username.as_str(),
        }
    }
}
