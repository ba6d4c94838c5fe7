//! Port trait definitions (Hexagonal Architecture)
//!
//! The domain depends on these traits, not on concrete implementations;
//! infrastructure adapters satisfy them.

pub mod model_client;

pub use model_client::{CompletionRequest, ModelClient, ModelError};
