//! Shared utilities

pub mod crypto;
pub mod decimal;
