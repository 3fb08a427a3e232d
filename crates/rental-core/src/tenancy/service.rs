use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::domain::{Actor, PropertyId, Role, TenantOrgId, UnitId};
use crate::error::ApiError;
use crate::policy::{self, AccessDenied, Action, ResourceScope};
use crate::repository::RepositoryError;

use super::domain::{NewProperty, NewUnit, OrgRegistration, Property, TenantOrg, Unit};
use super::repository::{PropertyRepository, TenantOrgRepository, UnitRepository};

static ORG_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PROPERTY_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static UNIT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

const MAX_TOTAL_UNITS: u32 = 1000;

/// Service owning the org/property/unit slice of the model.
pub struct TenancyService<T, P, U> {
    orgs: Arc<T>,
    properties: Arc<P>,
    units: Arc<U>,
}

/// Aggregated org summary for the management dashboard.
#[derive(Debug, Serialize)]
pub struct OrgDashboard {
    pub org: TenantOrg,
    pub properties: Vec<PropertySummary>,
}

#[derive(Debug, Serialize)]
pub struct PropertySummary {
    pub property: Property,
    pub units: Vec<Unit>,
}

/// What a cascade removal touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeOutcome {
    pub properties_removed: usize,
    pub units_removed: usize,
}

impl<T, P, U> TenancyService<T, P, U>
where
    T: TenantOrgRepository + 'static,
    P: PropertyRepository + 'static,
    U: UnitRepository + 'static,
{
    pub fn new(orgs: Arc<T>, properties: Arc<P>, units: Arc<U>) -> Self {
        Self {
            orgs,
            properties,
            units,
        }
    }

    /// Register a business organization.
    pub fn register_org(
        &self,
        registration: OrgRegistration,
        now: DateTime<Utc>,
    ) -> Result<TenantOrg, TenancyServiceError> {
        let business_name = registration.business_name.trim().to_string();
        let contact_email = registration.contact_email.trim().to_string();

        if business_name.is_empty() || business_name.len() > 200 {
            return Err(TenancyServiceError::InvalidBusinessName);
        }
        if !contact_email.contains('@') {
            return Err(TenancyServiceError::InvalidContactEmail);
        }
        if self.orgs.find_by_email(&contact_email)?.is_some() {
            return Err(TenancyServiceError::DuplicateBusinessEmail);
        }

        let org = TenantOrg {
            id: TenantOrgId(ORG_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            business_name,
            contact_email,
            contact_phone: registration.contact_phone,
            business_address: registration.business_address,
            tier: registration.subscription_plan,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let stored = self.orgs.insert(org)?;
        info!(business = %stored.business_name, tier = stored.tier.label(), "tenant org registered");
        Ok(stored)
    }

    /// Add a property, resolving the owning org from the actor: tenant-role
    /// actors always land on their own org, admins name one explicitly.
    pub fn add_property(
        &self,
        actor: &Actor,
        request: NewProperty,
        on_behalf_of: Option<TenantOrgId>,
        now: DateTime<Utc>,
    ) -> Result<Property, TenancyServiceError> {
        let account = policy::authorized_account(actor, Action::AddProperty, None)?;

        if request.total_units < 1 || request.total_units > MAX_TOTAL_UNITS {
            return Err(TenancyServiceError::InvalidUnitCount);
        }

        let org_id = match account.role {
            Role::Admin => on_behalf_of.ok_or(TenancyServiceError::OrgNotFound)?,
            _ => account
                .tenant_org_id
                .ok_or(TenancyServiceError::OrgNotFound)?,
        };
        let org = self
            .orgs
            .find(org_id)?
            .ok_or(TenancyServiceError::OrgNotFound)?;

        policy::authorize(
            actor,
            Action::AddProperty,
            Some(ResourceScope::TenantOrg(org.id)),
        )?;

        let property = Property {
            id: PropertyId(PROPERTY_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            owner_id: org.id,
            name: request.name.trim().to_string(),
            address: request.address.trim().to_string(),
            total_units: request.total_units,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let stored = self.properties.insert(property)?;
        info!(property = %stored.name, business = %org.business_name, "property added");
        Ok(stored)
    }

    /// Add a unit to a property the actor's org owns (admins exempt from the
    /// ownership check).
    pub fn add_unit(
        &self,
        actor: &Actor,
        property_id: PropertyId,
        request: NewUnit,
        now: DateTime<Utc>,
    ) -> Result<Unit, TenancyServiceError> {
        policy::authorize(actor, Action::AddUnit, None)?;

        if !request.rent_amount.is_finite() || request.rent_amount < 0.0 {
            return Err(TenancyServiceError::InvalidRent);
        }

        let property = self
            .properties
            .find(property_id)?
            .ok_or(TenancyServiceError::PropertyNotFound)?;

        policy::authorize(
            actor,
            Action::AddUnit,
            Some(ResourceScope::TenantOrg(property.owner_id)),
        )?;

        let unit = Unit {
            id: UnitId(UNIT_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            property_id: property.id,
            unit_number: request.unit_number.trim().to_string(),
            apartment_number: request.apartment_number.trim().to_string(),
            is_occupied: request.is_occupied,
            rent_cents: (request.rent_amount * 100.0).round() as u64,
            occupant_id: None,
            created_at: now,
            updated_at: now,
        };

        let stored = self.units.insert(unit)?;
        Ok(stored)
    }

    /// Management dashboard for one org: the org, its properties, and their
    /// units. Requires org administration or the admin role.
    pub fn org_dashboard(
        &self,
        actor: &Actor,
        org_id: TenantOrgId,
    ) -> Result<OrgDashboard, TenancyServiceError> {
        policy::authorize(
            actor,
            Action::ManageTenantOrg,
            Some(ResourceScope::TenantOrg(org_id)),
        )?;

        let org = self
            .orgs
            .find(org_id)?
            .ok_or(TenancyServiceError::OrgNotFound)?;

        let mut properties = Vec::new();
        for property in self.properties.list_for_org(org.id)? {
            let units = self.units.list_for_property(property.id)?;
            properties.push(PropertySummary { property, units });
        }

        Ok(OrgDashboard { org, properties })
    }

    /// Soft teardown: the only in-band way to retire an org.
    pub fn deactivate_org(
        &self,
        actor: &Actor,
        org_id: TenantOrgId,
        now: DateTime<Utc>,
    ) -> Result<TenantOrg, TenancyServiceError> {
        policy::authorize(
            actor,
            Action::ManageTenantOrg,
            Some(ResourceScope::TenantOrg(org_id)),
        )?;

        let mut org = self
            .orgs
            .find(org_id)?
            .ok_or(TenancyServiceError::OrgNotFound)?;
        org.is_active = false;
        org.updated_at = now;
        self.orgs.update(org.clone())?;
        Ok(org)
    }

    /// Cascade removal of an org and everything it owns. Declared by the data
    /// model but not reachable over HTTP; exercised directly by tests and
    /// operational tooling.
    pub fn remove_org_cascade(
        &self,
        org_id: TenantOrgId,
    ) -> Result<CascadeOutcome, TenancyServiceError> {
        if self.orgs.find(org_id)?.is_none() {
            return Err(TenancyServiceError::OrgNotFound);
        }

        let removed_properties = self.properties.remove_for_org(org_id)?;
        let units_removed = self.units.remove_for_properties(&removed_properties)?;
        self.orgs.remove(org_id)?;

        Ok(CascadeOutcome {
            properties_removed: removed_properties.len(),
            units_removed,
        })
    }
}

/// Error raised by the tenancy service.
#[derive(Debug, thiserror::Error)]
pub enum TenancyServiceError {
    #[error("business name must be between 1 and 200 characters")]
    InvalidBusinessName,
    #[error("contact email is not valid")]
    InvalidContactEmail,
    #[error("business email already registered")]
    DuplicateBusinessEmail,
    #[error("owning organization not found")]
    OrgNotFound,
    #[error("total units must be between 1 and 1000")]
    InvalidUnitCount,
    #[error("rent amount must not be negative")]
    InvalidRent,
    #[error("property not found")]
    PropertyNotFound,
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<TenancyServiceError> for ApiError {
    fn from(value: TenancyServiceError) -> Self {
        match value {
            TenancyServiceError::InvalidBusinessName
            | TenancyServiceError::InvalidContactEmail
            | TenancyServiceError::InvalidUnitCount
            | TenancyServiceError::InvalidRent => ApiError::Validation(value.to_string()),
            TenancyServiceError::DuplicateBusinessEmail => ApiError::Duplicate(value.to_string()),
            TenancyServiceError::OrgNotFound | TenancyServiceError::PropertyNotFound => {
                ApiError::NotFound(value.to_string())
            }
            TenancyServiceError::Denied(denied) => ApiError::Denied(denied),
            TenancyServiceError::Repository(err) => err.into(),
        }
    }
}
