//! Core library for the multi-tenant rental platform.
//!
//! The interesting part of this system is not the CRUD surface but the
//! authorization policy and visibility rules layered over it: which role may
//! perform which operation, which rows each actor is allowed to see, and the
//! duplicate guards on payments and maintenance requests. Those live in
//! [`policy`], [`visibility`], and the per-feature service modules. Everything
//! stateful goes through the repository traits so the HTTP layer, the CLI, and
//! the test suites can share the same engine over interchangeable gateways.

pub mod accounts;
pub mod auth;
pub mod config;
pub mod dashboards;
pub mod documents;
pub mod domain;
pub mod error;
pub mod maintenance;
pub mod memory;
pub mod notices;
pub mod payments;
pub mod policy;
pub mod repository;
pub mod storage;
pub mod telemetry;
pub mod tenancy;
pub mod visibility;
