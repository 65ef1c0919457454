//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod booking_repo;
pub mod group_repo;
pub mod item_repo;
pub mod project_repo;

pub use booking_repo::BookingRepo;
pub use group_repo::GroupRepo;
pub use item_repo::ItemRepo;
pub use project_repo::ProjectRepo;
