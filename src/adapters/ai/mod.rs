//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `OpenAIProvider` - OpenAI chat completions (JSON response mode)
//! - `MockAIProvider` - Configurable mock for testing

mod mock_provider;
mod openai_provider;

pub use mock_provider::{MockAIProvider, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
