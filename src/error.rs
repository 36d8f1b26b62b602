use thiserror::Error;

/// Errors surfaced by the analysis pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Missing or unreadable input file
    #[error("input error: {0}")]
    Input(String),

    /// Required external credentials absent
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network or timeout failure talking to an external collaborator.
    /// Always propagated; the core never retries.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The transcription provider reported a failed job
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// Malformed utterance data from the transcription stage
    #[error("validation error: {0}")]
    Validation(String),

    /// The gateway returned no parsable payload where one is required
    #[error("no parsable payload in {0} response")]
    MalformedResponse(&'static str),

    /// A per-segment classification call yielded no usable result.
    /// Fatal to the run: the argument list must stay dense.
    #[error("classification failed: {0}")]
    Classification(String),

    /// The relation-inference call failed outright
    #[error("relation inference failed: {0}")]
    Inference(String),

    /// A relation references an argument id outside the valid range
    #[error("graph integrity violation: {0}")]
    Integrity(String),

    /// Non-success status from the language-model API
    #[error("gateway error: {status} - {body}")]
    Gateway { status: u16, body: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
