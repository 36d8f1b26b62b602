use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::cache::{Fingerprint, JsonStore};
use crate::error::{AnalysisError, Result};
use crate::models::Transcript;

const ASSEMBLYAI_API_URL: &str = "https://api.assemblyai.com/v2";
const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Configuration for the AssemblyAI API client
#[derive(Debug, Clone)]
pub struct AssemblyAiConfig {
    /// API key (from ASSEMBLYAI_API_KEY env var)
    pub api_key: String,
    /// API base URL
    pub base_url: String,
}

impl AssemblyAiConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ASSEMBLYAI_API_KEY").map_err(|_| {
            AnalysisError::Configuration(
                "ASSEMBLYAI_API_KEY environment variable not set".to_string(),
            )
        })?;

        Ok(Self {
            api_key,
            base_url: ASSEMBLYAI_API_URL.to_string(),
        })
    }
}

/// Speech-to-text and diarization client.
///
/// Network and timeout failures surface as transport errors and are never
/// retried here; a provider-reported job failure is a transcription error.
pub struct Transcriber {
    client: Client,
    config: AssemblyAiConfig,
}

impl Transcriber {
    pub fn new(config: AssemblyAiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Transcribe and diarize one audio file: upload the bytes, submit a
    /// transcription job with speaker labels, poll until it settles.
    pub async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        let bytes = std::fs::read(audio_path).map_err(|e| {
            AnalysisError::Input(format!("cannot read {}: {}", audio_path.display(), e))
        })?;

        info!(
            "starting transcription and diarization for {}",
            audio_path.display()
        );

        let upload: UploadResponse = self
            .client
            .post(format!("{}/upload", self.config.base_url))
            .header("authorization", &self.config.api_key)
            .body(bytes)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let job: Transcript = self
            .client
            .post(format!("{}/transcript", self.config.base_url))
            .header("authorization", &self.config.api_key)
            .json(&TranscriptRequest {
                audio_url: upload.upload_url,
                speaker_labels: true,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        loop {
            let transcript: Transcript = self
                .client
                .get(format!("{}/transcript/{}", self.config.base_url, job.id))
                .header("authorization", &self.config.api_key)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            match transcript.status.as_str() {
                "completed" => {
                    info!("transcription and diarization completed");
                    return Ok(transcript);
                }
                "error" => {
                    let message = transcript
                        .error
                        .unwrap_or_else(|| "unknown provider error".to_string());
                    error!("transcription error: {}", message);
                    return Err(AnalysisError::Transcription(message));
                }
                status => {
                    info!("transcription status: {}", status);
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }
    }

    /// Return the cached transcript for this fingerprint, or transcribe and
    /// cache the result.
    pub async fn transcribe_with_cache(
        &self,
        store: &JsonStore,
        audio_path: &Path,
        fingerprint: &Fingerprint,
    ) -> Result<Transcript> {
        if let Some(cached) = store.load::<Transcript>(fingerprint)? {
            info!("using cached transcription");
            return Ok(cached);
        }

        let transcript = self.transcribe(audio_path).await?;
        store.save(fingerprint, &transcript)?;
        Ok(transcript)
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Serialize)]
struct TranscriptRequest {
    audio_url: String,
    speaker_labels: bool,
}
