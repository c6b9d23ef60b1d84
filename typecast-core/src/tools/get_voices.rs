use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::client::SpeechApi;
use crate::error::Result;
use crate::speech::GetVoicesParams;
use crate::tools::r#trait::{ToolExecutor, ToolOutput, ToolRequest};
use crate::tools::schema::input_schema_for;

pub struct GetVoicesTool {
    api: Arc<dyn SpeechApi>,
}

impl GetVoicesTool {
    pub fn new(api: Arc<dyn SpeechApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl ToolExecutor for GetVoicesTool {
    fn name(&self) -> &'static str {
        "get_voices"
    }

    fn description(&self) -> &'static str {
        "Get a list of available voices for text-to-speech. Optionally filter by model, \
         gender and age; only the filters provided are applied."
    }

    fn input_schema(&self) -> Value {
        input_schema_for::<GetVoicesParams>()
    }

    async fn call(&self, request: &ToolRequest) -> Result<ToolOutput> {
        let params: GetVoicesParams = request.parse()?;
        let filter = params.validate()?;

        let voices = self.api.list_voices(&filter).await?;
        debug!(count = voices.len(), ?filter, "Listed voices");
        Ok(ToolOutput::Json(serde_json::to_value(voices)?))
    }
}
