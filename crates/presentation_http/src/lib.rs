//! TruckScout HTTP presentation layer
//!
//! REST endpoints for address resolution and nearby listings, plus a
//! WebSocket channel that drives one suggestion session per connection.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse, set_expose_internal_errors};
pub use middleware::{REQUEST_ID_HEADER, RequestId, RequestIdLayer};
pub use routes::create_router;
pub use state::AppState;
