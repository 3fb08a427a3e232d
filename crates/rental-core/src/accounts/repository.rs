use crate::domain::{AccountId, Role};
use crate::repository::RepositoryError;

use super::domain::Account;

/// Storage abstraction for accounts.
///
/// `insert` must reject username/email collisions with `Conflict` even though
/// the service checks first; the adapter is the second net.
pub trait AccountRepository: Send + Sync {
    fn insert(&self, account: Account) -> Result<Account, RepositoryError>;
    fn find(&self, id: AccountId) -> Result<Option<Account>, RepositoryError>;
    fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError>;
    fn any_with_role(&self, role: Role) -> Result<bool, RepositoryError>;
    fn count_with_role(&self, role: Role) -> Result<usize, RepositoryError>;
}
