//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - An update DTO (all `Option` fields) where the entity is editable

pub mod enrollment;
pub mod lift;
pub mod lift_max;
pub mod lookup;
pub mod prescription;
pub mod program;
pub mod progression;
pub mod session;
pub mod user;
