//! Account registration, authentication, and the first-boot admin seed.

pub mod credentials;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use credentials::{Argon2CredentialHasher, CredentialError, CredentialHasher};
pub use domain::{Account, AccountView, Registration};
pub use repository::AccountRepository;
pub use router::account_router;
pub use service::{AccountService, AccountServiceError};
