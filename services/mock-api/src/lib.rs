//! In-memory development API for the invitation client
//!
//! Serves the REST and GraphQL contract the client talks to, seeded with two
//! accounts and one wedding. Tests drive it on an ephemeral port and use
//! [`MockState`] to inject failures and inspect traffic.

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::MockState;
