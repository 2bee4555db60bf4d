//! HTTP plumbing shared by Valora services: response envelope, error bodies,
//! health handlers, request-id/CORS layers and tracing setup.

pub mod envelope;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
