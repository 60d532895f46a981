//! Core types for the helper agent
//!
//! This crate provides the types shared by the client, API and server crates:
//! EntityId, EntityState as returned by Home Assistant, and the HelperType
//! enum describing which domains count as input helpers.

mod entity_id;
mod helper;
mod state;

pub use entity_id::{domain_of, EntityId, EntityIdError};
pub use helper::{is_helper_entity, HelperType, InvalidHelperType};
pub use state::EntityState;

/// Service name used to create a helper through its domain
pub const SERVICE_CREATE: &str = "create";

/// Service name used to delete a helper through its domain
pub const SERVICE_DELETE: &str = "delete";
