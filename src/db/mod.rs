//! Database module: the settings snapshot store.
//!
//! Layout:
//! - `actor.rs`: ractor actor owning the SQLite pool
//! - `gateway.rs`: best-effort save/load facade used by the rest of the crate
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)

pub mod actor;
pub mod gateway;
pub mod models;
pub mod schema;

pub use actor::{DbActorHandle, spawn};
pub use gateway::{PersistenceGateway, TENANT_MARKER};
pub use models::DbSettingsRow;
pub use schema::SQLITE_INIT;
