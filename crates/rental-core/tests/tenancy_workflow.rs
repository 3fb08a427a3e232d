//! Integration specifications for org/property/unit management: owner
//! resolution on property creation, org-scoped authorization, and the
//! declared cascade semantics.

use std::sync::Arc;

use chrono::Utc;

use rental_core::domain::{AccountId, Actor, ActorAccount, Role, TenantOrgId};
use rental_core::memory::{MemoryProperties, MemoryTenantOrgs, MemoryUnits};
use rental_core::tenancy::{
    NewProperty, NewUnit, OrgRegistration, SubscriptionTier, TenancyService, TenancyServiceError,
};

type Service = TenancyService<MemoryTenantOrgs, MemoryProperties, MemoryUnits>;

fn service() -> Service {
    TenancyService::new(
        Arc::new(MemoryTenantOrgs::default()),
        Arc::new(MemoryProperties::default()),
        Arc::new(MemoryUnits::default()),
    )
}

fn org_admin(id: u64, org: TenantOrgId) -> Actor {
    Actor::Account(ActorAccount {
        id: AccountId(id),
        username: format!("account-{id}"),
        role: Role::Tenant,
        tenant_org_id: Some(org),
        unit_id: None,
    })
}

fn admin() -> Actor {
    Actor::Account(ActorAccount {
        id: AccountId(99),
        username: "admin".to_string(),
        role: Role::Admin,
        tenant_org_id: None,
        unit_id: None,
    })
}

fn register_org(service: &Service, email: &str) -> TenantOrgId {
    service
        .register_org(
            OrgRegistration {
                business_name: "Riverfront Rentals".to_string(),
                contact_email: email.to_string(),
                contact_phone: None,
                business_address: None,
                subscription_plan: SubscriptionTier::Basic,
            },
            Utc::now(),
        )
        .expect("org registers")
        .id
}

fn property_request() -> NewProperty {
    NewProperty {
        name: "Riverfront Lofts".to_string(),
        address: "12 River Rd".to_string(),
        total_units: 24,
    }
}

#[test]
fn tenant_actor_lands_on_their_own_org() {
    let service = service();
    let org = register_org(&service, "office@riverfront.example");
    let actor = org_admin(1, org);

    let property = service
        .add_property(&actor, property_request(), None, Utc::now())
        .expect("property added");
    assert_eq!(property.owner_id, org);
}

#[test]
fn tenant_without_an_org_cannot_add_properties() {
    let service = service();
    let actor = Actor::Account(ActorAccount {
        id: AccountId(1),
        username: "casey".to_string(),
        role: Role::Tenant,
        tenant_org_id: None,
        unit_id: None,
    });

    let result = service.add_property(&actor, property_request(), None, Utc::now());
    assert!(matches!(result, Err(TenancyServiceError::OrgNotFound)));
}

#[test]
fn admin_adds_on_behalf_of_a_named_org() {
    let service = service();
    let org = register_org(&service, "office@riverfront.example");

    let property = service
        .add_property(&admin(), property_request(), Some(org), Utc::now())
        .expect("admin adds on behalf");
    assert_eq!(property.owner_id, org);
}

#[test]
fn admin_with_an_unknown_org_id_fails_with_org_not_found() {
    let service = service();
    register_org(&service, "office@riverfront.example");

    let result = service.add_property(
        &admin(),
        property_request(),
        Some(TenantOrgId(4242)),
        Utc::now(),
    );
    assert!(matches!(result, Err(TenancyServiceError::OrgNotFound)));
}

#[test]
fn unit_count_must_stay_inside_the_declared_range() {
    let service = service();
    let org = register_org(&service, "office@riverfront.example");
    let actor = org_admin(1, org);

    for total_units in [0, 1001] {
        let result = service.add_property(
            &actor,
            NewProperty {
                total_units,
                ..property_request()
            },
            None,
            Utc::now(),
        );
        assert!(matches!(result, Err(TenancyServiceError::InvalidUnitCount)));
    }
}

#[test]
fn org_dashboard_is_gated_to_its_administrators() {
    let service = service();
    let org = register_org(&service, "office@riverfront.example");
    let other_org = register_org(&service, "office@hilltop.example");
    let insider = org_admin(1, org);
    let outsider = org_admin(2, other_org);

    service
        .add_property(&insider, property_request(), None, Utc::now())
        .expect("property added");

    let dashboard = service
        .org_dashboard(&insider, org)
        .expect("insider sees the dashboard");
    assert_eq!(dashboard.properties.len(), 1);

    assert!(matches!(
        service.org_dashboard(&outsider, org),
        Err(TenancyServiceError::Denied(_))
    ));

    assert!(service.org_dashboard(&admin(), org).is_ok());
}

#[test]
fn units_attach_to_properties_of_the_actors_org_only() {
    let service = service();
    let org = register_org(&service, "office@riverfront.example");
    let other_org = register_org(&service, "office@hilltop.example");
    let insider = org_admin(1, org);
    let outsider = org_admin(2, other_org);

    let property = service
        .add_property(&insider, property_request(), None, Utc::now())
        .expect("property added");

    let unit = service
        .add_unit(
            &insider,
            property.id,
            NewUnit {
                unit_number: "2".to_string(),
                apartment_number: "201".to_string(),
                rent_amount: 1180.0,
                is_occupied: false,
            },
            Utc::now(),
        )
        .expect("unit added");
    assert_eq!(unit.rent_cents, 118_000);

    let result = service.add_unit(
        &outsider,
        property.id,
        NewUnit {
            unit_number: "3".to_string(),
            apartment_number: "301".to_string(),
            rent_amount: 990.0,
            is_occupied: false,
        },
        Utc::now(),
    );
    assert!(matches!(result, Err(TenancyServiceError::Denied(_))));
}

#[test]
fn negative_rent_is_rejected() {
    let service = service();
    let org = register_org(&service, "office@riverfront.example");
    let insider = org_admin(1, org);

    let property = service
        .add_property(&insider, property_request(), None, Utc::now())
        .expect("property added");

    let result = service.add_unit(
        &insider,
        property.id,
        NewUnit {
            unit_number: "2".to_string(),
            apartment_number: "201".to_string(),
            rent_amount: -5.0,
            is_occupied: false,
        },
        Utc::now(),
    );
    assert!(matches!(result, Err(TenancyServiceError::InvalidRent)));
}

#[test]
fn deactivation_is_the_soft_teardown_path() {
    let service = service();
    let org = register_org(&service, "office@riverfront.example");
    let insider = org_admin(1, org);

    let updated = service
        .deactivate_org(&insider, org, Utc::now())
        .expect("deactivation succeeds");
    assert!(!updated.is_active);

    // The org and its data remain; deactivation deletes nothing.
    assert!(service.org_dashboard(&insider, org).is_ok());
}

#[test]
fn cascade_removal_takes_properties_and_units_with_the_org() {
    let service = service();
    let org = register_org(&service, "office@riverfront.example");
    let insider = org_admin(1, org);

    let property = service
        .add_property(&insider, property_request(), None, Utc::now())
        .expect("property added");
    for unit_number in ["1", "2"] {
        service
            .add_unit(
                &insider,
                property.id,
                NewUnit {
                    unit_number: unit_number.to_string(),
                    apartment_number: format!("{unit_number}01"),
                    rent_amount: 1000.0,
                    is_occupied: false,
                },
                Utc::now(),
            )
            .expect("unit added");
    }

    let outcome = service
        .remove_org_cascade(org)
        .expect("cascade removal runs");
    assert_eq!(outcome.properties_removed, 1);
    assert_eq!(outcome.units_removed, 2);

    assert!(matches!(
        service.org_dashboard(&admin(), org),
        Err(TenancyServiceError::OrgNotFound)
    ));
}
