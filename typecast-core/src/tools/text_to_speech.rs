use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};

use crate::client::SpeechApi;
use crate::error::Result;
use crate::output::OutputWriter;
use crate::speech::TextToSpeechParams;
use crate::tools::r#trait::{ToolExecutor, ToolOutput, ToolRequest};
use crate::tools::schema::input_schema_for;

pub struct TextToSpeechTool {
    api: Arc<dyn SpeechApi>,
    writer: OutputWriter,
}

impl TextToSpeechTool {
    pub fn new(api: Arc<dyn SpeechApi>, writer: OutputWriter) -> Self {
        Self { api, writer }
    }
}

#[async_trait::async_trait]
impl ToolExecutor for TextToSpeechTool {
    fn name(&self) -> &'static str {
        "text_to_speech"
    }

    fn description(&self) -> &'static str {
        "Convert text to speech using the specified voice and parameters. Generated audio is \
         saved to the output directory and its path returned, or returned inline as base64 \
         when return_audio is true. Use emotion_type \"smart\" (ssfm-v30 only) to infer \
         emotion from previous_text/next_text."
    }

    fn input_schema(&self) -> Value {
        input_schema_for::<TextToSpeechParams>()
    }

    #[instrument(skip_all, fields(tool = "text_to_speech"))]
    async fn call(&self, request: &ToolRequest) -> Result<ToolOutput> {
        let params: TextToSpeechParams = request.parse()?;
        let synthesis = params.validate()?;

        info!(
            voice_id = %synthesis.voice_id,
            model = %synthesis.model,
            chars = synthesis.text.chars().count(),
            "Synthesizing speech"
        );
        let audio = self.api.synthesize(&synthesis).await?;

        if params.return_audio {
            return Ok(ToolOutput::Audio {
                mime_type: audio.format.mime_type(),
                data: audio.data,
            });
        }

        let path = self
            .writer
            .write(&synthesis.voice_id, &synthesis.text, &audio)
            .await?;
        Ok(ToolOutput::Text(format!(
            "Successfully generated speech for voice: {}. File saved: {}",
            synthesis.voice_id,
            path.display()
        )))
    }
}
