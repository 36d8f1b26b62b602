use tracing::{error, info};

use crate::error::{AnalysisError, Result};
use crate::llm::{Gateway, GatewayOutcome};
use crate::models::{Argument, Relation};

/// Evaluate all argument pairs in one gateway call and return the related
/// subset as (source, target, type) triples.
///
/// An empty list is a valid result. Anything else that goes wrong is logged
/// and propagated: a silently incomplete relation set would be
/// indistinguishable from "no relations found". Range and self-loop checks
/// belong to the graph assembler, not here.
pub async fn infer_relations<G: Gateway>(
    gateway: &G,
    arguments: &[Argument],
) -> Result<Vec<Relation>> {
    let outcome = match gateway.infer_relations(arguments).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("error during relations analysis: {}", e);
            return Err(e);
        }
    };

    match outcome {
        GatewayOutcome::Parsed(relations) => {
            info!(
                "inferred {} relations over {} arguments",
                relations.len(),
                arguments.len()
            );
            Ok(relations)
        }
        GatewayOutcome::Refused(reason) => {
            error!("model refused relation inference: {}", reason);
            Err(AnalysisError::Inference(format!(
                "model refused relation inference: {}",
                reason
            )))
        }
        GatewayOutcome::Unparsed => {
            error!("no parsed relations found in the response");
            Err(AnalysisError::Inference(
                "no parsed relations found in the response".to_string(),
            ))
        }
    }
}
