//! Typecast REST API client

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, Url};
use tracing::{debug, info, warn};

use super::provider::SpeechApi;
use crate::error::{Result, TypecastError};
use crate::settings::Settings;
use crate::speech::{SynthesisRequest, SynthesizedAudio};
use crate::voice::{AudioFormat, Voice, VoiceFilter};

const API_KEY_HEADER: &str = "X-API-KEY";

#[derive(Clone)]
pub struct TypecastClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl TypecastClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(concat!("typecast-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.api_host.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                TypecastError::Config(format!("API host {} cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(API_KEY_HEADER, &self.api_key)
    }

    /// Pass non-2xx responses through with the status and body untouched
    async fn check_status(response: Response, operation: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = error_body(response.text().await);
        warn!(%status, operation, body = %message, "Typecast API returned error");
        Err(TypecastError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

/// Body of an error response, or a placeholder saying why it was lost
pub(super) fn error_body<E: std::fmt::Display>(body: std::result::Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}

#[async_trait]
impl SpeechApi for TypecastClient {
    async fn list_voices(&self, filter: &VoiceFilter) -> Result<Vec<Voice>> {
        let url = self.endpoint(&["v2", "voices"])?;
        let query = filter.query_pairs();
        debug!(%url, ?query, "Listing voices");

        let response = self
            .authorized(self.client.get(url))
            .query(&query)
            .send()
            .await?;
        let response = Self::check_status(response, "list_voices").await?;

        let voices: Vec<Voice> = response.json().await?;
        info!(count = voices.len(), "Listed voices");
        Ok(voices)
    }

    async fn get_voice(&self, voice_id: &str) -> Result<Voice> {
        let url = self.endpoint(&["v2", "voices", voice_id])?;
        debug!(%url, "Fetching voice");

        let response = self.authorized(self.client.get(url)).send().await?;
        let response = Self::check_status(response, "get_voice").await?;

        Ok(response.json().await?)
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesizedAudio> {
        let url = self.endpoint(&["v1", "text-to-speech"])?;
        info!(
            voice_id = %request.voice_id,
            model = %request.model,
            text_chars = request.text.chars().count(),
            format = %request.output.audio_format,
            "Requesting speech synthesis"
        );

        let response = self
            .authorized(self.client.post(url))
            .json(request)
            .send()
            .await?;
        let response = Self::check_status(response, "text_to_speech").await?;

        let requested = request.output.audio_format;
        let format = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(AudioFormat::from_content_type)
            .unwrap_or(requested);
        if format != requested {
            warn!(%requested, returned = %format, "Upstream returned a different audio format");
        }

        let data = response.bytes().await?.to_vec();
        debug!(bytes = data.len(), %format, "Received synthesized audio");

        Ok(SynthesizedAudio { data, format })
    }
}
