//! Observability - request IDs.

mod request_id;

pub use request_id::{RequestId, RequestIdMiddleware, current_request_id, request_id_of};
