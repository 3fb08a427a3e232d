use crate::domain::{PropertyId, TenantOrgId};
use crate::repository::RepositoryError;

use super::domain::{Property, TenantOrg, Unit};

/// Storage abstraction for organizations. `insert` enforces contact-email
/// uniqueness as the second net behind the service precondition.
pub trait TenantOrgRepository: Send + Sync {
    fn insert(&self, org: TenantOrg) -> Result<TenantOrg, RepositoryError>;
    fn find(&self, id: TenantOrgId) -> Result<Option<TenantOrg>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<TenantOrg>, RepositoryError>;
    fn update(&self, org: TenantOrg) -> Result<(), RepositoryError>;
    fn remove(&self, id: TenantOrgId) -> Result<(), RepositoryError>;
}

pub trait PropertyRepository: Send + Sync {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError>;
    fn find(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError>;
    fn list_for_org(&self, org: TenantOrgId) -> Result<Vec<Property>, RepositoryError>;
    /// Delete every property of an org, returning the removed ids so unit
    /// cleanup can follow.
    fn remove_for_org(&self, org: TenantOrgId) -> Result<Vec<PropertyId>, RepositoryError>;
}

pub trait UnitRepository: Send + Sync {
    fn insert(&self, unit: Unit) -> Result<Unit, RepositoryError>;
    fn find(&self, id: crate::domain::UnitId) -> Result<Option<Unit>, RepositoryError>;
    fn list_for_property(&self, property: PropertyId) -> Result<Vec<Unit>, RepositoryError>;
    fn remove_for_properties(&self, properties: &[PropertyId]) -> Result<usize, RepositoryError>;
}
