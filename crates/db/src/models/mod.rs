//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create/Update DTOs where the resource supports them
//! - A safe response struct where the row carries data that must not be
//!   serialized to API responses (see `user`)

pub mod campaign;
pub mod character;
pub mod inventory;
pub mod item;
pub mod journal;
pub mod member;
pub mod session;
pub mod user;
