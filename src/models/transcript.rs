use serde::{Deserialize, Serialize};

/// A single word from the diarizer with speaker attribution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Word {
    /// The recognized text
    pub text: String,
    /// Start timestamp in milliseconds
    pub start: u64,
    /// End timestamp in milliseconds
    pub end: u64,
    /// Transcription accuracy score (0-1)
    pub confidence: f64,
    /// Speaker label, stable within one transcript
    pub speaker: String,
}

/// One speech turn from the diarization stage. Produced entirely by the
/// transcription provider; the pipeline never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Start timestamp in milliseconds
    pub start: u64,
    /// End timestamp in milliseconds
    pub end: u64,
    pub confidence: f64,
    pub speaker: String,
    /// Per-word breakdown
    #[serde(default)]
    pub words: Vec<Word>,
}

/// The persisted transcription record for one audio file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Provider-assigned transcript id
    pub id: String,
    /// Full transcript text
    #[serde(default)]
    pub text: Option<String>,
    /// Time-ordered, speaker-tagged utterances
    #[serde(default)]
    pub utterances: Vec<Utterance>,
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Total audio duration in seconds
    #[serde(default)]
    pub audio_duration: Option<f64>,
    /// Provider job status ("queued", "processing", "completed", "error")
    pub status: String,
    /// Provider error message, set when status is "error"
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl Transcript {
    /// Number of distinct speaker labels across all utterances
    pub fn speaker_count(&self) -> usize {
        let mut speakers: Vec<&str> = self
            .utterances
            .iter()
            .map(|u| u.speaker.as_str())
            .collect();
        speakers.sort_unstable();
        speakers.dedup();
        speakers.len()
    }
}
