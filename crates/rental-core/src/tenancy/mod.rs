//! Tenant organizations and the property/unit inventory they own.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    NewProperty, NewUnit, OrgRegistration, Property, SubscriptionTier, TenantOrg, Unit,
};
pub use repository::{PropertyRepository, TenantOrgRepository, UnitRepository};
pub use router::tenancy_router;
pub use service::{CascadeOutcome, TenancyService, TenancyServiceError};
