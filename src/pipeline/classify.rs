use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::llm::{Gateway, GatewayOutcome};
use crate::models::{ArgumentAnalysis, Segment};

/// Obtain the scheme classification for one segment.
///
/// There is no partial-argument fallback: a refusal or a missing payload is
/// fatal to the whole run, because a gap would break the dense-id invariant
/// the relation inferer and graph assembler rely on.
pub async fn classify_segment<G: Gateway>(
    gateway: &G,
    segment: &Segment,
) -> Result<ArgumentAnalysis> {
    match gateway.classify_argument(segment).await? {
        GatewayOutcome::Parsed(analysis) => {
            debug!(
                "segment from speaker {} classified as {}",
                segment.speaker, analysis.scheme
            );
            Ok(analysis)
        }
        GatewayOutcome::Refused(reason) => Err(AnalysisError::Classification(format!(
            "model refused classification: {}",
            reason
        ))),
        GatewayOutcome::Unparsed => Err(AnalysisError::Classification(
            "no parsed argument analysis found in the response".to_string(),
        )),
    }
}
