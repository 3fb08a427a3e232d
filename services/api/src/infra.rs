use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use metrics_exporter_prometheus::PrometheusHandle;

use rental_core::accounts::{Account, AccountService, Argon2CredentialHasher};
use rental_core::auth::ActorResolver;
use rental_core::config::StorageConfig;
use rental_core::dashboards::DashboardService;
use rental_core::documents::DocumentService;
use rental_core::domain::ActorAccount;
use rental_core::maintenance::MaintenanceService;
use rental_core::memory::{
    MemoryAccounts, MemoryDocuments, MemoryMaintenance, MemoryNotifications, MemoryPayments,
    MemoryProperties, MemorySessions, MemoryTenantOrgs, MemoryUnits,
};
use rental_core::notices::NoticeService;
use rental_core::payments::PaymentService;
use rental_core::storage::{FileStore, StorageError, StoredFile};
use rental_core::tenancy::TenancyService;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Bearer-token session registry. Tokens are random salt strings; the
/// registry lives as long as the process, matching the in-memory gateways.
#[derive(Default)]
pub(crate) struct SessionStore {
    sessions: MemorySessions,
}

impl SessionStore {
    pub(crate) fn issue(&self, account: &Account) -> String {
        let token = SaltString::generate(&mut OsRng).as_str().to_string();
        self.sessions.register(&token, ActorAccount::from(account));
        token
    }

    pub(crate) fn revoke(&self, token: &str) -> bool {
        self.sessions.revoke(token).is_some()
    }
}

impl ActorResolver for SessionStore {
    fn resolve(&self, token: &str) -> Option<ActorAccount> {
        self.sessions.resolve(token)
    }
}

/// Local-disk file store rooted at the configured upload directory.
pub(crate) struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Read a file by its stored name, for the `/uploads` route.
    pub(crate) fn open_named(&self, filename: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.root.join(filename);
        self.read(&path.to_string_lossy())
    }
}

impl FileStore for LocalFileStore {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<StoredFile, StorageError> {
        fs::create_dir_all(&self.root).map_err(|err| StorageError::Backend(err.to_string()))?;
        let path = self.root.join(filename);
        fs::write(&path, bytes).map_err(|err| StorageError::Backend(err.to_string()))?;
        Ok(StoredFile {
            filename: filename.to_string(),
            path: path.to_string_lossy().into_owned(),
        })
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StorageError::Missing(path.to_string()))
            }
            Err(err) => Err(StorageError::Backend(err.to_string())),
        }
    }

    fn exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }
}

pub(crate) type Accounts = AccountService<MemoryAccounts, Argon2CredentialHasher>;
pub(crate) type Tenancy = TenancyService<MemoryTenantOrgs, MemoryProperties, MemoryUnits>;
pub(crate) type Payments = PaymentService<MemoryPayments>;
pub(crate) type Maintenance = MaintenanceService<MemoryMaintenance>;
pub(crate) type Notices = NoticeService<MemoryNotifications, LocalFileStore>;
pub(crate) type Documents = DocumentService<MemoryDocuments, LocalFileStore>;
pub(crate) type Dashboards =
    DashboardService<MemoryAccounts, MemoryPayments, MemoryMaintenance, MemoryNotifications>;

/// Every service the router needs, wired over shared gateways.
pub(crate) struct Services {
    pub(crate) accounts: Arc<Accounts>,
    pub(crate) tenancy: Arc<Tenancy>,
    pub(crate) payments: Arc<Payments>,
    pub(crate) maintenance: Arc<Maintenance>,
    pub(crate) notices: Arc<Notices>,
    pub(crate) documents: Arc<Documents>,
    pub(crate) dashboards: Arc<Dashboards>,
    pub(crate) sessions: Arc<SessionStore>,
    pub(crate) files: Arc<LocalFileStore>,
}

impl Services {
    pub(crate) fn build(storage: &StorageConfig) -> Self {
        let accounts_repo = Arc::new(MemoryAccounts::default());
        let orgs_repo = Arc::new(MemoryTenantOrgs::default());
        let properties_repo = Arc::new(MemoryProperties::default());
        let units_repo = Arc::new(MemoryUnits::default());
        let payments_repo = Arc::new(MemoryPayments::default());
        let maintenance_repo = Arc::new(MemoryMaintenance::default());
        let notifications_repo = Arc::new(MemoryNotifications::default());
        let documents_repo = Arc::new(MemoryDocuments::default());
        let files = Arc::new(LocalFileStore::new(storage.upload_dir.clone()));

        Self {
            accounts: Arc::new(AccountService::new(
                accounts_repo.clone(),
                Arc::new(Argon2CredentialHasher),
            )),
            tenancy: Arc::new(TenancyService::new(
                orgs_repo,
                properties_repo,
                units_repo,
            )),
            payments: Arc::new(PaymentService::new(payments_repo.clone())),
            maintenance: Arc::new(MaintenanceService::new(maintenance_repo.clone())),
            notices: Arc::new(NoticeService::new(
                notifications_repo.clone(),
                files.clone(),
            )),
            documents: Arc::new(DocumentService::new(documents_repo, files.clone())),
            dashboards: Arc::new(DashboardService::new(
                accounts_repo,
                payments_repo,
                maintenance_repo,
                notifications_repo,
            )),
            sessions: Arc::new(SessionStore::default()),
            files,
        }
    }
}
