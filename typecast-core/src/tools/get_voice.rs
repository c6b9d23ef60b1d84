use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::client::SpeechApi;
use crate::error::Result;
use crate::speech::GetVoiceParams;
use crate::tools::r#trait::{ToolExecutor, ToolOutput, ToolRequest};
use crate::tools::schema::input_schema_for;

pub struct GetVoiceTool {
    api: Arc<dyn SpeechApi>,
}

impl GetVoiceTool {
    pub fn new(api: Arc<dyn SpeechApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl ToolExecutor for GetVoiceTool {
    fn name(&self) -> &'static str {
        "get_voice"
    }

    fn description(&self) -> &'static str {
        "Get details of a single voice, including the models and emotions it supports."
    }

    fn input_schema(&self) -> Value {
        input_schema_for::<GetVoiceParams>()
    }

    async fn call(&self, request: &ToolRequest) -> Result<ToolOutput> {
        let params: GetVoiceParams = request.parse()?;
        let voice = self.api.get_voice(params.validate()?).await?;
        debug!(
            voice_id = %voice.voice_id,
            gender = ?voice.gender(),
            models = voice.models().len(),
            "Fetched voice"
        );
        Ok(ToolOutput::Json(serde_json::to_value(voice)?))
    }
}
