//! Data layer: storage service, row types, repositories

pub mod sqlite;
pub mod types;
