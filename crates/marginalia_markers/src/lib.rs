//! Marker resolution engine for marginalia.
//!
//! Documents carry markers such as `{{ai_fact:Rust}}` or
//! `{{ai_answer:Rust:Who created it?}}`. The [`Engine`] finds the innermost
//! markers, dispatches them to a [`MarkerHandler`] and splices the results
//! back into the text, repeating until nothing resolvable remains or the
//! iteration cap is reached.
//!
//! [`HandlerCatalog`] is the production handler. It grounds every marker in
//! a [`ReferenceLookup`](marginalia_interface::ReferenceLookup) and, when one
//! is configured, polishes the result with a
//! [`TextGenerator`](marginalia_interface::TextGenerator).
//!
//! # Example
//!
//! ```rust,no_run
//! use marginalia_markers::{CatalogConfig, Engine, EngineConfig, HandlerCatalog};
//! # use marginalia_interface::ReferenceLookup;
//! # use std::sync::Arc;
//!
//! # async fn example(lookup: Arc<dyn ReferenceLookup>) {
//! let catalog = HandlerCatalog::new(lookup, None, CatalogConfig::default());
//! let engine = Engine::new(catalog, EngineConfig::default());
//!
//! let doc = engine.resolve("Read more: {{ai_link:Rust language}}", &[]).await;
//! println!("{}", doc);
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod config;
mod engine;
mod handler;
mod kind;
mod params;
mod scanner;
mod substitution;
mod text;

pub use catalog::{ANSWER_SENTINEL, HandlerCatalog};
pub use config::{
    CatalogConfig, CatalogConfigBuilder, CatalogConfigBuilderError, EngineConfig,
    EngineConfigBuilder, EngineConfigBuilderError,
};
pub use engine::{Engine, ResolutionReport, Termination};
pub use handler::{MarkerCall, MarkerHandler};
pub use kind::MarkerKind;
pub use params::{SplitPolicy, split_params};
pub use scanner::{MarkerOccurrence, scan};
pub use substitution::{SubstitutionValue, apply_substitutions};
pub use text::{clean_generated, extract_key_info, first_sentence, truncate_chars};
