//! LLM provider abstraction and backend implementations.

pub mod any;
pub mod error;
pub mod gemini;
pub mod http;
#[cfg(feature = "mock")]
pub mod mock;
pub mod provider;
pub mod together;

pub use error::LlmError;
pub use provider::LlmProvider;
