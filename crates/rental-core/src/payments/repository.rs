use crate::domain::{AccountId, Month};
use crate::repository::RepositoryError;

use super::domain::Payment;

/// Storage abstraction for payments.
pub trait PaymentRepository: Send + Sync {
    fn insert(&self, payment: Payment) -> Result<Payment, RepositoryError>;
    fn list_all(&self) -> Result<Vec<Payment>, RepositoryError>;
    fn list_for_payer(&self, payer: AccountId) -> Result<Vec<Payment>, RepositoryError>;
    /// The payment (if any) already recorded for a billing period. The
    /// duplicate guard reads this before writing; it is not a compare-and-swap.
    fn find_period(
        &self,
        payer: AccountId,
        month: Month,
        year: i32,
    ) -> Result<Option<Payment>, RepositoryError>;
    fn count_completed(&self) -> Result<usize, RepositoryError>;
}
