//! Integration specifications for notifications: audience visibility and the
//! attachment/row coupling when storage fails.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use rental_core::domain::{AccountId, Actor, ActorAccount, Role, TargetAudience};
use rental_core::memory::{MemoryFileStore, MemoryNotifications};
use rental_core::notices::{
    Attachment, NoticeDraft, NoticePriority, NoticeService, NoticeServiceError,
    NotificationRepository,
};
use rental_core::storage::{FileStore, StorageError, StoredFile};

fn actor(role: Role, id: u64) -> Actor {
    Actor::Account(ActorAccount {
        id: AccountId(id),
        username: format!("account-{id}"),
        role,
        tenant_org_id: None,
        unit_id: None,
    })
}

fn draft(title: &str, audience: TargetAudience) -> NoticeDraft {
    NoticeDraft {
        title: title.to_string(),
        content: "Water will be shut off on Saturday morning.".to_string(),
        priority: NoticePriority::High,
        audience,
    }
}

/// File store that refuses every write, standing in for a full disk.
struct BrokenFileStore;

impl FileStore for BrokenFileStore {
    fn save(&self, _filename: &str, _bytes: &[u8]) -> Result<StoredFile, StorageError> {
        Err(StorageError::Backend("disk full".to_string()))
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        Err(StorageError::Missing(path.to_string()))
    }

    fn exists(&self, _path: &str) -> bool {
        false
    }
}

#[test]
fn only_owners_post_notifications() {
    let repository = Arc::new(MemoryNotifications::default());
    let service = NoticeService::new(repository, Arc::new(MemoryFileStore::default()));

    let result = service.post(
        &actor(Role::Tenant, 1),
        draft("Water shutoff", TargetAudience::Everyone),
        None,
        Utc::now(),
    );
    assert!(matches!(result, Err(NoticeServiceError::Denied(_))));
}

#[test]
fn storage_failure_aborts_the_post_with_no_row() {
    let repository = Arc::new(MemoryNotifications::default());
    let service = NoticeService::new(repository.clone(), Arc::new(BrokenFileStore));

    let result = service.post(
        &actor(Role::Owner, 1),
        draft("Water shutoff", TargetAudience::Everyone),
        Some(Attachment {
            filename: "schedule.pdf".to_string(),
            bytes: b"%PDF-1.4 schedule".to_vec(),
        }),
        Utc::now(),
    );
    assert!(matches!(result, Err(NoticeServiceError::Storage(_))));
    assert!(
        repository.list_all().expect("list runs").is_empty(),
        "no notification row without its attachment"
    );
}

#[test]
fn a_post_without_attachment_never_touches_the_file_store() {
    let repository = Arc::new(MemoryNotifications::default());
    // BrokenFileStore would fail any save; the post must still succeed.
    let service = NoticeService::new(repository.clone(), Arc::new(BrokenFileStore));

    service
        .post(
            &actor(Role::Owner, 1),
            draft("Water shutoff", TargetAudience::Everyone),
            None,
            Utc::now(),
        )
        .expect("plain post succeeds");
    assert_eq!(repository.list_all().expect("list runs").len(), 1);
}

#[test]
fn attachment_is_stored_and_recorded_on_the_row() {
    let repository = Arc::new(MemoryNotifications::default());
    let files = Arc::new(MemoryFileStore::default());
    let service = NoticeService::new(repository, files.clone());

    let notification = service
        .post(
            &actor(Role::Owner, 1),
            draft("Water shutoff", TargetAudience::Everyone),
            Some(Attachment {
                filename: "shutoff schedule.pdf".to_string(),
                bytes: b"%PDF-1.4 schedule".to_vec(),
            }),
            Utc::now(),
        )
        .expect("post succeeds");

    let stored = notification.attachment.expect("attachment recorded");
    assert_eq!(stored, "shutoff_schedule.pdf");
    assert!(files.exists(&stored));
}

#[test]
fn tenants_never_see_owner_only_notifications() {
    let repository = Arc::new(MemoryNotifications::default());
    let service = NoticeService::new(repository, Arc::new(MemoryFileStore::default()));
    let owner = actor(Role::Owner, 1);
    let tenant = actor(Role::Tenant, 2);
    let base = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();

    service
        .post(&owner, draft("Insurance renewal", TargetAudience::Owner), None, base)
        .expect("owner-only post");
    service
        .post(
            &owner,
            draft("Water shutoff", TargetAudience::Everyone),
            None,
            base + Duration::hours(1),
        )
        .expect("broadcast post");
    service
        .post(
            &owner,
            draft("Rent reminder", TargetAudience::Tenant),
            None,
            base + Duration::hours(2),
        )
        .expect("tenant post");

    let tenant_rows = service.list(&tenant).expect("tenant lists");
    assert_eq!(tenant_rows.len(), 2);
    assert!(tenant_rows
        .iter()
        .all(|row| row.target_role != TargetAudience::Owner));
    // Newest first.
    assert_eq!(tenant_rows[0].title, "Rent reminder");

    let owner_rows = service.list(&owner).expect("owner lists");
    assert_eq!(owner_rows.len(), 3);
}

#[test]
fn recent_returns_at_most_the_requested_posts() {
    let repository = Arc::new(MemoryNotifications::default());
    let service = NoticeService::new(repository, Arc::new(MemoryFileStore::default()));
    let owner = actor(Role::Owner, 1);
    let base = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();

    for hour in 0..5 {
        service
            .post(
                &owner,
                draft(&format!("Notice {hour}"), TargetAudience::Everyone),
                None,
                base + Duration::hours(hour),
            )
            .expect("post succeeds");
    }

    let recent = service.recent(&owner, 3).expect("recent posts");
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].title, "Notice 4");
}
