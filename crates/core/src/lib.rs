//! Pure domain logic for gearbook: shared types, the error taxonomy, the
//! availability engine and the booking conflict validator.
//!
//! This crate has zero internal deps and performs no I/O, so it can be used
//! by the API/repository layer and by any future CLI tooling. All functions
//! here operate on point-in-time snapshots handed in by the caller and never
//! mutate them.

pub mod availability;
pub mod booking;
pub mod conflict;
pub mod error;
pub mod types;
