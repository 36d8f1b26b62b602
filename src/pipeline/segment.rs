use tracing::{info, warn};

use crate::error::{AnalysisError, Result};
use crate::llm::{Gateway, GatewayOutcome};
use crate::models::{Segment, Utterance};

/// Greedy single-pass merge of consecutive same-speaker utterances.
///
/// Starts a new segment on every speaker change; otherwise space-joins the
/// utterance text onto the current segment. Never merges across speakers.
pub fn local_merge(utterances: &[Utterance]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();

    for utterance in utterances {
        match segments.last_mut() {
            Some(current) if current.speaker == utterance.speaker => {
                current.text.push(' ');
                current.text.push_str(&utterance.text);
            }
            _ => segments.push(Segment {
                text: utterance.text.clone(),
                speaker: utterance.speaker.clone(),
            }),
        }
    }

    segments
}

/// Produce the final argument segments: local merge, then one gateway
/// refinement call that may drop interjections or re-split within a speaker.
///
/// Failure policy: a refusal or a request failure degrades to the local
/// result, so segment count and speaker integrity survive a misbehaving
/// gateway. A response that arrives but carries no parsable payload is a hard
/// error at this call site.
pub async fn merge_segments<G: Gateway>(
    gateway: &G,
    utterances: &[Utterance],
) -> Result<Vec<Segment>> {
    let local = local_merge(utterances);

    if local.is_empty() {
        return Ok(local);
    }

    match gateway.refine_segments(&local).await {
        Ok(GatewayOutcome::Parsed(refined)) => {
            info!(
                "refinement produced {} segments from {} local segments",
                refined.len(),
                local.len()
            );
            Ok(refined)
        }
        Ok(GatewayOutcome::Refused(reason)) => {
            warn!("model refused merge refinement: {}", reason);
            Ok(local)
        }
        Ok(GatewayOutcome::Unparsed) => Err(AnalysisError::MalformedResponse("merge refinement")),
        Err(e) => {
            warn!("merge refinement failed, using local merge: {}", e);
            Ok(local)
        }
    }
}
