//! Rent payments: submission with the one-completed-per-period guard, the
//! tenant payment history, and the owner-facing global ledger.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Payment, PaymentRequest, PaymentStatus, PaymentView};
pub use repository::PaymentRepository;
pub use router::payment_router;
pub use service::{PaymentService, PaymentServiceError};
