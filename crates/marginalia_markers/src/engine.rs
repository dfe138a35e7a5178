//! The resolution loop.

use crate::{
    EngineConfig, MarkerCall, MarkerHandler, MarkerKind, MarkerOccurrence, SubstitutionValue,
    apply_substitutions, scan, split_params,
};
use derive_getters::Getters;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Why the resolution loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Termination {
    /// No resolvable markers remain
    #[strum(serialize = "fixpoint")]
    Fixpoint,
    /// Markers remain but the last iteration left the text unchanged.
    ///
    /// Includes handlers that return their own marker verbatim. Running on
    /// to the cap would produce the same document.
    #[strum(serialize = "stalled")]
    Stalled,
    /// The iteration cap was reached
    #[strum(serialize = "capped")]
    Capped,
}

/// Outcome of one [`Engine::resolve_with_report`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ResolutionReport {
    /// The resolved document
    document: String,
    /// Scan/resolve iterations that ran
    iterations: usize,
    /// Why the loop stopped
    termination: Termination,
    /// Distinct markers still present in the document
    unresolved: Vec<String>,
}

impl ResolutionReport {
    /// Consume the report and return the document.
    pub fn into_document(self) -> String {
        self.document
    }
}

/// Resolves markers in documents by dispatching them to a handler.
///
/// Each iteration resolves the innermost markers, so nested markers are
/// evaluated from the inside out. Resolution never fails: markers that
/// are unknown or whose handler errors stay in the document as written.
#[derive(Debug, Clone)]
pub struct Engine<H> {
    handler: H,
    config: EngineConfig,
}

impl<H: MarkerHandler> Engine<H> {
    /// Create an engine over `handler`.
    pub fn new(handler: H, config: EngineConfig) -> Self {
        Self { handler, config }
    }

    /// The marker handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Loop settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve every marker in `document`.
    ///
    /// `substitutions` replace `{{name}}` with literal values once, before
    /// any marker is resolved.
    pub async fn resolve(
        &self,
        document: &str,
        substitutions: &[(&str, SubstitutionValue)],
    ) -> String {
        self.resolve_with_report(document, substitutions)
            .await
            .into_document()
    }

    /// Like [`resolve`](Self::resolve), also reporting how the loop ended.
    #[instrument(skip(self, document, substitutions), fields(length = document.len(), substitutions = substitutions.len()))]
    pub async fn resolve_with_report(
        &self,
        document: &str,
        substitutions: &[(&str, SubstitutionValue)],
    ) -> ResolutionReport {
        let mut document = apply_substitutions(document, substitutions);
        let max_iterations = *self.config.max_iterations();
        let mut iterations = 0;

        let termination = loop {
            let found = distinct(scan(&document));
            if found.is_empty() {
                break Termination::Fixpoint;
            }
            if iterations >= max_iterations {
                warn!(
                    max_iterations,
                    remaining = found.len(),
                    "Iteration cap reached, leaving markers unresolved"
                );
                break Termination::Capped;
            }
            iterations += 1;
            debug!(iteration = iterations, matches = found.len(), "Resolving markers");

            let replacements = join_all(
                found
                    .iter()
                    .map(|m| self.resolve_one_marker(m.name(), m.raw_params().as_deref())),
            )
            .await;

            let mut changed = false;
            for (marker, replacement) in found.iter().zip(replacements) {
                if replacement != *marker.span() {
                    document = document.replace(marker.span().as_str(), &replacement);
                    changed = true;
                }
            }
            if !changed {
                debug!(iteration = iterations, "No marker could be resolved");
                break Termination::Stalled;
            }
        };

        let unresolved: Vec<String> = distinct(scan(&document))
            .into_iter()
            .map(|m| m.span().clone())
            .collect();
        info!(
            iterations,
            termination = %termination,
            unresolved = unresolved.len(),
            "Resolution finished"
        );

        ResolutionReport {
            document,
            iterations,
            termination,
            unresolved,
        }
    }

    /// Resolve a single marker to its replacement text.
    ///
    /// Unknown markers and handler failures return the original marker
    /// text, `{{name:raw_params}}` or `{{name}}`.
    pub async fn resolve_one_marker(&self, name: &str, raw_params: Option<&str>) -> String {
        let original = match raw_params {
            Some(raw) => format!("{{{{{}:{}}}}}", name, raw),
            None => format!("{{{{{}}}}}", name),
        };

        let Some(kind) = MarkerKind::parse(name) else {
            warn!(marker = %name, "Unknown marker, leaving it in place");
            return original;
        };

        let raw = raw_params.unwrap_or_default();
        let call = MarkerCall::new(kind, raw, split_params(raw, kind.split_policy()));
        match self.handler.handle(&call).await {
            Ok(text) => text,
            Err(e) => {
                warn!(marker = %name, error = %e, "Marker handler failed, leaving it in place");
                original
            }
        }
    }
}

/// Drop repeated spans, keeping first-occurrence order.
fn distinct(found: Vec<MarkerOccurrence>) -> Vec<MarkerOccurrence> {
    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter(|m| seen.insert(m.span().clone()))
        .collect()
}
