//! HTTP handlers, one module per resource.
//!
//! Handlers follow the same shape throughout: extract the authenticated
//! caller, load the entities involved, run the pure decision functions from
//! `ttrpg_core`, then persist the outcome (inside a transaction when the
//! operation is a read-check-write).

pub mod auth;
pub mod campaign;
pub mod character;
pub mod inventory;
pub mod item;
pub mod journal;
pub mod user;
