//! HTTP surface for legal queries, summarization, and health checks.

mod error;
mod handlers;
mod router;
mod server;

pub use error::GatewayError;
pub use server::GatewayServer;
