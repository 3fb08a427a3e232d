//! Maintenance requests: requester-private tickets with a soft duplicate
//! guard and a three-state lifecycle.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    MaintenanceRequest, NewRequest, RequestCategory, RequestPriority, RequestStatus, RequestView,
};
pub use repository::MaintenanceRepository;
pub use router::maintenance_router;
pub use service::{MaintenanceService, MaintenanceServiceError};
