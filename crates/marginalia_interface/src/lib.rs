//! Trait definitions for the collaborators of the marker engine.
//!
//! The engine never fetches facts or generates text itself. It talks to a
//! [`ReferenceLookup`] for grounding and to a [`TextGenerator`] for prose,
//! so both can be swapped for stubs in tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{GeneratorLoader, ProgressSink, ReferenceLookup, TextGenerator, normalize_topic};
