use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::{AccountId, Role};
use crate::error::ApiError;
use crate::repository::RepositoryError;

use super::credentials::{CredentialError, CredentialHasher};
use super::domain::{Account, Registration};
use super::repository::AccountRepository;

const ADMIN_USERNAME: &str = "admin";
const ADMIN_EMAIL: &str = "admin@rentalhub.com";

static ACCOUNT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_account_id() -> AccountId {
    AccountId(ACCOUNT_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Service composing the account gateway and the credential hasher.
pub struct AccountService<R, H> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> AccountService<R, H>
where
    R: AccountRepository + 'static,
    H: CredentialHasher + 'static,
{
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new account.
    ///
    /// Preconditions run before the insert: duplicate checks are explicit,
    /// and the adapter's conflict detection is only the fallback net.
    pub fn register(
        &self,
        registration: Registration,
        now: DateTime<Utc>,
    ) -> Result<Account, AccountServiceError> {
        let username = registration.username.trim().to_string();
        let email = registration.email.trim().to_string();

        if username.len() < 4 || username.len() > 20 {
            return Err(AccountServiceError::UsernameLength);
        }
        if !looks_like_email(&email) {
            return Err(AccountServiceError::InvalidEmail);
        }
        if registration.password.len() < 6 {
            return Err(AccountServiceError::PasswordTooShort);
        }

        if self.repository.find_by_username(&username)?.is_some() {
            return Err(AccountServiceError::DuplicateUsername);
        }
        if self.repository.find_by_email(&email)?.is_some() {
            return Err(AccountServiceError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash(&registration.password)?;

        let account = Account {
            id: next_account_id(),
            username,
            email,
            password_hash,
            role: registration.role,
            phone: registration.phone,
            tenant_org_id: registration.tenant_org_id,
            unit_id: registration.unit_id,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(account)?;
        info!(username = %stored.username, role = stored.role.label(), "account registered");
        Ok(stored)
    }

    /// Check a username/password pair. The failure is uniform across unknown
    /// usernames and wrong passwords so the response leaks nothing.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Account, AccountServiceError> {
        let account = match self.repository.find_by_username(username.trim())? {
            Some(account) => account,
            None => {
                warn!(username = username.trim(), "failed login attempt");
                return Err(AccountServiceError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &account.password_hash)? {
            warn!(username = %account.username, "failed login attempt");
            return Err(AccountServiceError::InvalidCredentials);
        }

        info!(username = %account.username, "login successful");
        Ok(account)
    }

    pub fn find(&self, id: AccountId) -> Result<Option<Account>, AccountServiceError> {
        Ok(self.repository.find(id)?)
    }

    /// First-boot seeding: create the single admin account if none exists.
    /// Idempotent; re-running never creates a second admin.
    pub fn ensure_admin(
        &self,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, AccountServiceError> {
        if self.repository.any_with_role(Role::Admin)? {
            return Ok(None);
        }

        let admin = self.register(
            Registration {
                username: ADMIN_USERNAME.to_string(),
                email: ADMIN_EMAIL.to_string(),
                password: password.to_string(),
                role: Role::Admin,
                phone: None,
                tenant_org_id: None,
                unit_id: None,
            },
            now,
        )?;
        info!(username = ADMIN_USERNAME, "default admin created");
        Ok(Some(admin))
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

/// Error raised by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error("username must be between 4 and 20 characters")]
    UsernameLength,
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
    #[error("username already exists")]
    DuplicateUsername,
    #[error("email already registered")]
    DuplicateEmail,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<AccountServiceError> for ApiError {
    fn from(value: AccountServiceError) -> Self {
        match value {
            AccountServiceError::UsernameLength
            | AccountServiceError::InvalidEmail
            | AccountServiceError::PasswordTooShort => ApiError::Validation(value.to_string()),
            AccountServiceError::DuplicateUsername | AccountServiceError::DuplicateEmail => {
                ApiError::Duplicate(value.to_string())
            }
            AccountServiceError::InvalidCredentials => ApiError::Unauthorized(value.to_string()),
            AccountServiceError::Credential(err) => ApiError::Internal(err.to_string()),
            AccountServiceError::Repository(err) => err.into(),
        }
    }
}
