use crate::error::{AnalysisError, Result};
use crate::models::{Transcript, Utterance};

/// Shape the raw transcript into the ordered utterance sequence the merger
/// consumes. Pure data shaping: no inference, no network calls.
pub fn normalize(transcript: &Transcript) -> Result<Vec<Utterance>> {
    for (index, utterance) in transcript.utterances.iter().enumerate() {
        if utterance.speaker.is_empty() {
            return Err(AnalysisError::Validation(format!(
                "utterance {} has an empty speaker label",
                index
            )));
        }
        if utterance.text.is_empty() {
            return Err(AnalysisError::Validation(format!(
                "utterance {} has empty text",
                index
            )));
        }
    }

    Ok(transcript.utterances.clone())
}
