//! In-memory persistence adapters.
//!
//! These back the default deployment and every test suite. Each adapter
//! serializes access with a mutex and enforces the storage-level uniqueness
//! nets (`Conflict`) behind the service-level precondition checks. State is
//! process-local; restarting the service starts from an empty store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::accounts::domain::Account;
use crate::accounts::repository::AccountRepository;
use crate::auth::ActorResolver;
use crate::documents::domain::Document;
use crate::documents::repository::DocumentRepository;
use crate::domain::{
    AccountId, ActorAccount, DocumentId, Month, NoticeId, PaymentId, PropertyId, RequestId, Role,
    TenantOrgId, UnitId,
};
use crate::maintenance::domain::{MaintenanceRequest, RequestStatus};
use crate::maintenance::repository::MaintenanceRepository;
use crate::notices::domain::Notification;
use crate::notices::repository::NotificationRepository;
use crate::payments::domain::{Payment, PaymentStatus};
use crate::payments::repository::PaymentRepository;
use crate::repository::RepositoryError;
use crate::storage::{FileStore, StorageError, StoredFile};
use crate::tenancy::domain::{Property, TenantOrg, Unit};
use crate::tenancy::repository::{PropertyRepository, TenantOrgRepository, UnitRepository};

#[derive(Default, Clone)]
pub struct MemoryAccounts {
    records: Arc<Mutex<HashMap<AccountId, Account>>>,
}

impl AccountRepository for MemoryAccounts {
    fn insert(&self, account: Account) -> Result<Account, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&account.id) {
            return Err(RepositoryError::Conflict);
        }
        let collision = guard.values().any(|existing| {
            existing.username == account.username || existing.email == account.email
        });
        if collision {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(account.id, account.clone());
        Ok(account)
    }

    fn find(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|account| account.username == username)
            .cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|account| account.email == email)
            .cloned())
    }

    fn any_with_role(&self, role: Role) -> Result<bool, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().any(|account| account.role == role))
    }

    fn count_with_role(&self, role: Role) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().filter(|account| account.role == role).count())
    }
}

#[derive(Default, Clone)]
pub struct MemoryTenantOrgs {
    records: Arc<Mutex<HashMap<TenantOrgId, TenantOrg>>>,
}

impl TenantOrgRepository for MemoryTenantOrgs {
    fn insert(&self, org: TenantOrg) -> Result<TenantOrg, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&org.id) {
            return Err(RepositoryError::Conflict);
        }
        if guard
            .values()
            .any(|existing| existing.contact_email == org.contact_email)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(org.id, org.clone());
        Ok(org)
    }

    fn find(&self, id: TenantOrgId) -> Result<Option<TenantOrg>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<TenantOrg>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|org| org.contact_email == email)
            .cloned())
    }

    fn update(&self, org: TenantOrg) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&org.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(org.id, org);
        Ok(())
    }

    fn remove(&self, id: TenantOrgId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(&id).ok_or(RepositoryError::NotFound)?;
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MemoryProperties {
    records: Arc<Mutex<HashMap<PropertyId, Property>>>,
}

impl PropertyRepository for MemoryProperties {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&property.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(property.id, property.clone());
        Ok(property)
    }

    fn find(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list_for_org(&self, org: TenantOrgId) -> Result<Vec<Property>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut properties: Vec<Property> = guard
            .values()
            .filter(|property| property.owner_id == org)
            .cloned()
            .collect();
        properties.sort_by_key(|property| property.id);
        Ok(properties)
    }

    fn remove_for_org(&self, org: TenantOrgId) -> Result<Vec<PropertyId>, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let removed: Vec<PropertyId> = guard
            .values()
            .filter(|property| property.owner_id == org)
            .map(|property| property.id)
            .collect();
        for id in &removed {
            guard.remove(id);
        }
        Ok(removed)
    }
}

#[derive(Default, Clone)]
pub struct MemoryUnits {
    records: Arc<Mutex<HashMap<UnitId, Unit>>>,
}

impl UnitRepository for MemoryUnits {
    fn insert(&self, unit: Unit) -> Result<Unit, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&unit.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(unit.id, unit.clone());
        Ok(unit)
    }

    fn find(&self, id: UnitId) -> Result<Option<Unit>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list_for_property(&self, property: PropertyId) -> Result<Vec<Unit>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut units: Vec<Unit> = guard
            .values()
            .filter(|unit| unit.property_id == property)
            .cloned()
            .collect();
        units.sort_by_key(|unit| unit.id);
        Ok(units)
    }

    fn remove_for_properties(&self, properties: &[PropertyId]) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let doomed: Vec<UnitId> = guard
            .values()
            .filter(|unit| properties.contains(&unit.property_id))
            .map(|unit| unit.id)
            .collect();
        for id in &doomed {
            guard.remove(id);
        }
        Ok(doomed.len())
    }
}

#[derive(Default, Clone)]
pub struct MemoryPayments {
    records: Arc<Mutex<HashMap<PaymentId, Payment>>>,
}

impl PaymentRepository for MemoryPayments {
    fn insert(&self, payment: Payment) -> Result<Payment, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&payment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(payment.id, payment.clone());
        Ok(payment)
    }

    fn list_all(&self) -> Result<Vec<Payment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn list_for_payer(&self, payer: AccountId) -> Result<Vec<Payment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|payment| payment.payer_id == payer)
            .cloned()
            .collect())
    }

    fn find_period(
        &self,
        payer: AccountId,
        month: Month,
        year: i32,
    ) -> Result<Option<Payment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|payment| {
                payment.payer_id == payer && payment.month == month && payment.year == year
            })
            .cloned())
    }

    fn count_completed(&self) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|payment| payment.status == PaymentStatus::Completed)
            .count())
    }
}

#[derive(Default, Clone)]
pub struct MemoryMaintenance {
    records: Arc<Mutex<HashMap<RequestId, MaintenanceRequest>>>,
}

impl MaintenanceRepository for MemoryMaintenance {
    fn insert(
        &self,
        request: MaintenanceRequest,
    ) -> Result<MaintenanceRequest, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&request.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(request.id, request.clone());
        Ok(request)
    }

    fn find(&self, id: RequestId) -> Result<Option<MaintenanceRequest>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn update(&self, request: MaintenanceRequest) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&request.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(request.id, request);
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<MaintenanceRequest>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn find_recent_with_title(
        &self,
        requester: AccountId,
        title: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<MaintenanceRequest>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|request| {
                request.requester_id == requester
                    && request.title == title
                    && request.created_at > since
            })
            .cloned())
    }

    fn count_open(&self) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|request| request.status == RequestStatus::Open)
            .count())
    }
}

#[derive(Default, Clone)]
pub struct MemoryNotifications {
    records: Arc<Mutex<HashMap<NoticeId, Notification>>>,
}

impl NotificationRepository for MemoryNotifications {
    fn insert(&self, notification: Notification) -> Result<Notification, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&notification.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(notification.id, notification.clone());
        Ok(notification)
    }

    fn list_all(&self) -> Result<Vec<Notification>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub struct MemoryDocuments {
    records: Arc<Mutex<HashMap<DocumentId, Document>>>,
}

impl DocumentRepository for MemoryDocuments {
    fn insert(&self, document: Document) -> Result<Document, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&document.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(document.id, document.clone());
        Ok(document)
    }

    fn find(&self, id: DocumentId) -> Result<Option<Document>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list_all(&self) -> Result<Vec<Document>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn list_for_uploader(&self, uploader: AccountId) -> Result<Vec<Document>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|document| document.uploaded_by == uploader)
            .cloned()
            .collect())
    }
}

/// In-memory file store. Paths are the sanitized filenames themselves.
#[derive(Default, Clone)]
pub struct MemoryFileStore {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryFileStore {
    /// Drop a stored file, for exercising the missing-backing-file path.
    pub fn remove(&self, path: &str) {
        self.files
            .lock()
            .expect("file store mutex poisoned")
            .remove(path);
    }

    pub fn len(&self) -> usize {
        self.files.lock().expect("file store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FileStore for MemoryFileStore {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<StoredFile, StorageError> {
        let mut guard = self.files.lock().expect("file store mutex poisoned");
        guard.insert(filename.to_string(), bytes.to_vec());
        Ok(StoredFile {
            filename: filename.to_string(),
            path: filename.to_string(),
        })
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let guard = self.files.lock().expect("file store mutex poisoned");
        guard
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::Missing(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        let guard = self.files.lock().expect("file store mutex poisoned");
        guard.contains_key(path)
    }
}

/// In-memory bearer-token session registry.
#[derive(Default, Clone)]
pub struct MemorySessions {
    sessions: Arc<Mutex<HashMap<String, ActorAccount>>>,
}

impl MemorySessions {
    pub fn register(&self, token: &str, account: ActorAccount) {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .insert(token.to_string(), account);
    }

    pub fn revoke(&self, token: &str) -> Option<ActorAccount> {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .remove(token)
    }
}

impl ActorResolver for MemorySessions {
    fn resolve(&self, token: &str) -> Option<ActorAccount> {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .get(token)
            .cloned()
    }
}
