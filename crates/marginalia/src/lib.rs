//! Marginalia - resolve `{{ai_*}}` markers in documents.
//!
//! Documents carry markers such as `{{ai_fact:Rust}}`,
//! `{{ai_link:Rust}}` or `{{ai_answer:Rust:Who created it?}}`. Marginalia
//! grounds each marker in a reference lookup (Wikipedia by default),
//! optionally polishes the result with a local generative model, and
//! splices the text back into the document.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use marginalia::{Marginalia, MarginaliaConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MarginaliaConfig::load()?;
//! let marginalia = Marginalia::from_config(&config)?;
//!
//! let doc = marginalia
//!     .resolve("Rust: {{ai_describe:Rust (programming language)}}", &[])
//!     .await;
//! println!("{}", doc);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `marginalia_error` - Error types
//! - `marginalia_core` - Summary records, generation requests, telemetry
//! - `marginalia_interface` - `ReferenceLookup` and `TextGenerator` traits
//! - `marginalia_cache` - TTL cache used by the lookup client
//! - `marginalia_lookup` - Wikipedia REST client
//! - `marginalia_models` - OpenAI-compatible client and shared generator
//! - `marginalia_markers` - Resolution engine and handler catalog
//!
//! This crate (`marginalia`) wires them together and re-exports everything
//! for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod marginalia;

pub use config::MarginaliaConfig;
pub use marginalia::Marginalia;

pub use marginalia_cache::*;
pub use marginalia_core::*;
pub use marginalia_error::*;
pub use marginalia_interface::*;
pub use marginalia_lookup::*;
pub use marginalia_markers::*;
pub use marginalia_models::*;
