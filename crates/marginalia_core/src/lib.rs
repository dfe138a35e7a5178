//! Core data types shared across the marginalia workspace.
//!
//! These are plain values exchanged between the marker engine and its two
//! collaborators: summary records from the reference lookup service, and
//! requests/responses for the generative backend.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod progress;
mod request;
mod summary;
mod telemetry;

pub use progress::{LoadProgress, LoadStatus};
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateRequestBuilderError, GenerateResponse,
    SamplingOptions,
};
pub use summary::{SearchHit, SummaryRecord, SummaryRecordBuilder, SummaryRecordBuilderError};
pub use telemetry::{init_logging, init_telemetry, shutdown_telemetry};
