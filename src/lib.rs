pub mod cache;
pub mod error;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod transcribe;

pub use cache::{Fingerprint, JsonStore};
pub use error::{AnalysisError, Result};
pub use llm::{Gateway, GatewayOutcome, OpenAiClient, OpenAiConfig};
pub use models::{
    Analysis, Argument, ArgumentAnalysis, ArgumentGraph, Relation, RelationType, Segment,
    Transcript, Utterance, Word,
};
pub use pipeline::{local_merge, merge_segments, normalize, DebateAnalyzer};
pub use transcribe::{AssemblyAiConfig, Transcriber};
