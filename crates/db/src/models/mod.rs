//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! The booking module additionally provides conversions into the engine
//! views from `gearbook_core::booking`.

pub mod booking;
pub mod group;
pub mod item;
pub mod project;
