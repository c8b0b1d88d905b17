//! Row types shared by repositories and consumers
//!
//! Field names serialize in camelCase: the persisted entity set and its field
//! names are the wire contract with existing exports and reports.

pub mod collaboration;
pub mod costs;
pub mod history;
pub mod matrices;
pub mod scenarios;
pub mod sync;
pub mod transactional;

pub use collaboration::*;
pub use costs::*;
pub use history::*;
pub use matrices::*;
pub use scenarios::*;
pub use sync::*;
pub use transactional::*;
