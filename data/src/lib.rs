//! TerraBuild data layer
//!
//! Persistence and validation for the TerraBuild building-cost estimation
//! system: cost matrices and factors, material catalogs, saved estimates,
//! an append-only calculation history, collaboration (shared projects,
//! invitations, comments, shareable links), imported Benton assessment
//! matrices, what-if scenarios, and ingestion bookkeeping (FTP connection
//! profiles, sync schedules, run history).
//!
//! Consumers (HTTP API, importers, report jobs) are external. They interact
//! with this crate through:
//! - [`domain::payloads`] — insertable payload types with derived validation,
//! - [`data::sqlite`] — the pooled SQLite service and entity repositories,
//! - [`domain::principal::Principal`] — the request-scoped caller identity
//!   required by mutating collaboration operations.

pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
