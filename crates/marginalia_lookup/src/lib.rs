//! Reference lookup collaborator.
//!
//! Fetches canonical page summaries from the Wikipedia REST API, caches
//! them by normalized subject name, and degrades to placeholder records
//! instead of failing.
//!
//! # Example
//!
//! ```rust,no_run
//! use marginalia_interface::ReferenceLookup;
//! use marginalia_lookup::{LookupConfig, WikipediaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = WikipediaClient::new(LookupConfig::default())?;
//! let record = client.get_summary("JavaScript").await;
//! println!("{}: {}", record.title(), record.description());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod dto;

pub use client::WikipediaClient;
pub use config::{LookupConfig, LookupConfigBuilder};
