//! Generative backend collaborator.
//!
//! - [`ServerClient`] talks to any OpenAI-compatible `/v1/chat/completions`
//!   endpoint (llama.cpp server, mistral.rs, vLLM, Ollama's OpenAI shim).
//! - [`ServerLoader`] builds `ServerClient`s on demand, checking the server
//!   is reachable while it "loads".
//! - [`SharedGenerator`] owns the single model instance shared by every
//!   handler: lazy coalesced initialization, serialized inference, explicit
//!   model switching and progress reporting.
//!
//! # Example
//!
//! ```rust,no_run
//! use marginalia_core::GenerateRequest;
//! use marginalia_interface::TextGenerator;
//! use marginalia_models::{GeneratorConfig, ServerLoader, SharedGenerator};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeneratorConfig::default();
//! let generator = SharedGenerator::new(Arc::new(ServerLoader::new(config.clone())), config.model());
//!
//! let request = GenerateRequest::builder().prompt("Say hello.").build()?;
//! let response = generator.generate(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod loader;
mod request;
mod response;
mod shared;

pub use client::ServerClient;
pub use config::{GeneratorConfig, GeneratorConfigBuilder};
pub use loader::ServerLoader;
pub use request::{ChatCompletionRequest, Message};
pub use response::{ChatCompletionResponse, Choice, ChoiceMessage, Usage};
pub use shared::SharedGenerator;
