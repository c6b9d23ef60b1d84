use async_trait::async_trait;

use crate::error::Result;
use crate::speech::{SynthesisRequest, SynthesizedAudio};
use crate::voice::{Voice, VoiceFilter};

/// The upstream operations the tools depend on
#[async_trait]
pub trait SpeechApi: Send + Sync {
    /// List voices matching the filter
    async fn list_voices(&self, filter: &VoiceFilter) -> Result<Vec<Voice>>;

    /// Fetch a single voice by id
    async fn get_voice(&self, voice_id: &str) -> Result<Voice>;

    /// Synthesize speech for an already validated request
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesizedAudio>;
}
