pub mod client;
pub mod prompts;

pub use client::*;

use crate::error::Result;
use crate::models::{Argument, ArgumentAnalysis, Relation, Segment};

/// Outcome of one structured-output request.
///
/// Every call site must handle all three arms: a refusal and a missing or
/// undecodable payload are different situations with different policies per
/// pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayOutcome<T> {
    /// Schema-validated payload
    Parsed(T),
    /// The model explicitly declined, with its stated reason
    Refused(String),
    /// No payload, or a payload that did not decode against the schema
    Unparsed,
}

/// Structured-output interface to the language model.
///
/// Injected into each pipeline stage so tests can substitute a fake without
/// process-wide state. Errors from these methods are transport or API
/// failures; model-level refusal and parse failure travel in the outcome.
pub trait Gateway {
    /// Refine locally-merged segments: drop interjections, re-split or
    /// re-merge within a speaker, never across speakers.
    fn refine_segments(
        &self,
        segments: &[Segment],
    ) -> impl Future<Output = Result<GatewayOutcome<Vec<Segment>>>> + Send;

    /// Classify one segment's argumentation scheme
    fn classify_argument(
        &self,
        segment: &Segment,
    ) -> impl Future<Output = Result<GatewayOutcome<ArgumentAnalysis>>> + Send;

    /// Evaluate all argument pairs and return the related subset
    fn infer_relations(
        &self,
        arguments: &[Argument],
    ) -> impl Future<Output = Result<GatewayOutcome<Vec<Relation>>>> + Send;
}
