use serde_json::Value;

use crate::error::Result;
use crate::knowledge::knowledge;
use crate::speech::params::NoParams;
use crate::tools::r#trait::{ToolExecutor, ToolOutput, ToolRequest};
use crate::tools::schema::input_schema_for;

pub struct KnowledgeTool;

#[async_trait::async_trait]
impl ToolExecutor for KnowledgeTool {
    fn name(&self) -> &'static str {
        "get_typecast_knowledge"
    }

    fn description(&self) -> &'static str {
        "Reference for the Typecast API: authentication, endpoints, parameters, emotion \
         support per model, error codes, languages and examples."
    }

    fn input_schema(&self) -> Value {
        input_schema_for::<NoParams>()
    }

    async fn call(&self, _request: &ToolRequest) -> Result<ToolOutput> {
        Ok(ToolOutput::Text(knowledge()))
    }
}
