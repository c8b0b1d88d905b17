//! Domain layer: request-scoped principal, insertable payload types with
//! derived validation, polymorphic target resolution, matrix lookup
//! strategies

pub mod matrix;
pub mod payloads;
pub mod principal;
pub mod target;
pub mod validate;

pub use principal::Principal;
