//! Outbound HTTP collaborator used by the channel adapters.

pub mod client;
pub mod transport;

pub use client::{HTTP_CLIENT, HttpTransport};
pub use transport::{HttpMethod, JsonRequest, Transport, TransportResponse};
