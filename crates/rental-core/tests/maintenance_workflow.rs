//! Integration specifications for the maintenance queue: the rolling
//! duplicate guard, the status state machine and its resolution-stamp
//! invariant, and requester privacy.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use rental_core::domain::{AccountId, Actor, ActorAccount, Role};
use rental_core::maintenance::{
    MaintenanceRepository, MaintenanceService, MaintenanceServiceError, NewRequest,
    RequestCategory, RequestPriority, RequestStatus,
};
use rental_core::memory::MemoryMaintenance;

fn actor(role: Role, id: u64) -> Actor {
    Actor::Account(ActorAccount {
        id: AccountId(id),
        username: format!("account-{id}"),
        role,
        tenant_org_id: None,
        unit_id: None,
    })
}

fn leak_request(title: &str) -> NewRequest {
    NewRequest {
        title: title.to_string(),
        description: "Water pooling under the kitchen sink.".to_string(),
        category: RequestCategory::Plumbing,
        priority: RequestPriority::High,
    }
}

fn service() -> (MaintenanceService<MemoryMaintenance>, Arc<MemoryMaintenance>) {
    let repository = Arc::new(MemoryMaintenance::default());
    (MaintenanceService::new(repository.clone()), repository)
}

#[test]
fn identical_title_within_24_hours_is_a_duplicate() {
    let (service, repository) = service();
    let tenant = actor(Role::Tenant, 1);
    let noon = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();

    service
        .submit(&tenant, leak_request("Kitchen sink leak"), noon)
        .expect("first request succeeds");

    let result = service.submit(
        &tenant,
        leak_request("Kitchen sink leak"),
        noon + Duration::hours(23),
    );
    assert!(matches!(
        result,
        Err(MaintenanceServiceError::DuplicateRequest)
    ));
    assert_eq!(repository.list_all().expect("list runs").len(), 1);
}

#[test]
fn the_same_title_after_the_window_creates_a_second_row() {
    let (service, repository) = service();
    let tenant = actor(Role::Tenant, 1);
    let noon = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();

    service
        .submit(&tenant, leak_request("Kitchen sink leak"), noon)
        .expect("first request succeeds");
    service
        .submit(
            &tenant,
            leak_request("Kitchen sink leak"),
            noon + Duration::hours(25),
        )
        .expect("outside the window the guard does not apply");

    assert_eq!(repository.list_all().expect("list runs").len(), 2);
}

#[test]
fn different_requesters_may_share_a_title() {
    let (service, repository) = service();
    let noon = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();

    service
        .submit(&actor(Role::Tenant, 1), leak_request("No heat"), noon)
        .expect("first tenant");
    service
        .submit(&actor(Role::Tenant, 2), leak_request("No heat"), noon)
        .expect("second tenant is not blocked by the first");

    assert_eq!(repository.list_all().expect("list runs").len(), 2);
}

#[test]
fn resolution_stamp_tracks_the_completed_status_exactly() {
    let (service, repository) = service();
    let tenant = actor(Role::Tenant, 1);
    let owner = actor(Role::Owner, 9);
    let noon = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();

    let ticket = service
        .submit(&tenant, leak_request("Kitchen sink leak"), noon)
        .expect("request created");
    assert_eq!(ticket.status, RequestStatus::Open);
    assert!(ticket.resolved_at.is_none());

    let ticket = service
        .update_status(&owner, ticket.id, "in_progress", noon + Duration::hours(1))
        .expect("owner moves it along");
    assert!(ticket.resolved_at.is_none());

    let ticket = service
        .update_status(&owner, ticket.id, "completed", noon + Duration::hours(2))
        .expect("owner completes it");
    assert_eq!(ticket.status, RequestStatus::Completed);
    assert_eq!(ticket.resolved_at, Some(noon + Duration::hours(2)));

    // Reopening clears the stamp: resolved_at is set iff completed.
    let ticket = service
        .update_status(&owner, ticket.id, "open", noon + Duration::hours(3))
        .expect("owner reopens it");
    assert_eq!(ticket.status, RequestStatus::Open);
    assert!(ticket.resolved_at.is_none());

    let stored = repository
        .find(ticket.id)
        .expect("lookup runs")
        .expect("row present");
    assert!(stored.resolved_at.is_none());
}

#[test]
fn unknown_status_strings_are_rejected() {
    let (service, _) = service();
    let tenant = actor(Role::Tenant, 1);
    let owner = actor(Role::Owner, 9);
    let noon = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();

    let ticket = service
        .submit(&tenant, leak_request("Kitchen sink leak"), noon)
        .expect("request created");

    let result = service.update_status(&owner, ticket.id, "escalated", noon);
    assert!(matches!(
        result,
        Err(MaintenanceServiceError::InvalidStatus)
    ));
}

#[test]
fn only_owners_and_admins_update_status_and_only_tenants_file() {
    let (service, _) = service();
    let tenant = actor(Role::Tenant, 1);
    let admin = actor(Role::Admin, 8);
    let owner = actor(Role::Owner, 9);
    let noon = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();

    let ticket = service
        .submit(&tenant, leak_request("Kitchen sink leak"), noon)
        .expect("request created");

    assert!(matches!(
        service.update_status(&tenant, ticket.id, "completed", noon),
        Err(MaintenanceServiceError::Denied(_))
    ));
    assert!(service
        .update_status(&admin, ticket.id, "in_progress", noon)
        .is_ok());

    assert!(matches!(
        service.submit(&owner, leak_request("Lobby light"), noon),
        Err(MaintenanceServiceError::Denied(_))
    ));
}

#[test]
fn tenants_see_only_their_own_requests() {
    let (service, _) = service();
    let alice = actor(Role::Tenant, 1);
    let bob = actor(Role::Tenant, 2);
    let owner = actor(Role::Owner, 9);
    let noon = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();

    service
        .submit(&alice, leak_request("Kitchen sink leak"), noon)
        .expect("alice files");
    service
        .submit(&bob, leak_request("Broken window"), noon + Duration::hours(1))
        .expect("bob files");

    let alice_rows = service.list(&alice).expect("alice lists");
    assert_eq!(alice_rows.len(), 1);
    assert_eq!(alice_rows[0].requester_id, AccountId(1));

    let owner_rows = service.list(&owner).expect("owner lists");
    assert_eq!(owner_rows.len(), 2);
    // Newest first.
    assert_eq!(owner_rows[0].title, "Broken window");
}

#[test]
fn missing_request_is_not_found() {
    let (service, _) = service();
    let owner = actor(Role::Owner, 9);
    let noon = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();

    let result = service.update_status(
        &owner,
        rental_core::domain::RequestId(9999),
        "completed",
        noon,
    );
    assert!(matches!(result, Err(MaintenanceServiceError::NotFound)));
}
