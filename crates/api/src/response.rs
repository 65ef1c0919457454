//! Response envelope for computed endpoints.
//!
//! CRUD endpoints return the entity bare; computed results (availability
//! reports) are wrapped in `{ "data": ... }` so the payload shape can grow
//! without breaking clients.

use serde::Serialize;

/// `{ "data": T }` envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
