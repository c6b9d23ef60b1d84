use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::client::SpeechApi;
use crate::error::{Result, TypecastError};
use crate::output::OutputWriter;
use crate::playback::AudioPlayer;
use crate::tools::fuzzy_json::coerce_to_schema;
use crate::tools::get_voice::GetVoiceTool;
use crate::tools::get_voices::GetVoicesTool;
use crate::tools::knowledge::KnowledgeTool;
use crate::tools::play_audio::PlayAudioTool;
use crate::tools::r#trait::{SharedTool, ToolOutput, ToolRequest};
use crate::tools::text_to_speech::TextToSpeechTool;

/// Name, description and input schema of a registered tool
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

pub struct ToolRegistry {
    tools: BTreeMap<String, SharedTool>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<SharedTool>) -> Self {
        let mut registry = Self {
            tools: BTreeMap::new(),
        };

        for tool in tools {
            registry.register_tool(tool);
        }

        registry
    }

    /// The Typecast tool set over the given upstream, output directory and
    /// player.
    pub fn standard(api: Arc<dyn SpeechApi>, writer: OutputWriter, player: AudioPlayer) -> Self {
        Self::new(vec![
            Arc::new(GetVoicesTool::new(api.clone())),
            Arc::new(GetVoiceTool::new(api.clone())),
            Arc::new(TextToSpeechTool::new(api, writer)),
            Arc::new(PlayAudioTool::new(player)),
            Arc::new(KnowledgeTool),
        ])
    }

    pub fn register_tool(&mut self, tool: SharedTool) {
        let name = tool.name().to_string();
        debug!(tool_name = %name, "Registering tool");
        self.tools.insert(name, tool);
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    /// Coerce `arguments` to the tool's schema and run it.
    pub async fn call(&self, name: &str, arguments: &Value) -> Result<ToolOutput> {
        let Some(tool) = self.tools.get(name) else {
            warn!(tool_name = %name, "Unknown tool");
            return Err(TypecastError::UnknownTool(format!(
                "{name}. Available tools: {}",
                self.list_tools().join(", ")
            )));
        };

        let schema = tool.input_schema();
        let request = ToolRequest::new(coerce_to_schema(arguments, &schema));

        match tool.call(&request).await {
            Ok(output) => {
                info!(tool_name = %name, "Tool call succeeded");
                Ok(output)
            }
            Err(e) if e.is_caller_error() => {
                warn!(tool_name = %name, error = %e, "Tool call rejected");
                Err(e)
            }
            Err(e) => {
                error!(tool_name = %name, error = %e, "Tool call failed");
                Err(e)
            }
        }
    }

    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::r#trait::ToolExecutor;
    use serde::Deserialize;
    use serde_json::json;

    struct Echo;

    #[derive(Deserialize)]
    struct EchoParams {
        count: i64,
    }

    #[async_trait::async_trait]
    impl ToolExecutor for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echo the count"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "properties": {"count": {"type": "integer"}}})
        }

        async fn call(&self, request: &ToolRequest) -> Result<ToolOutput> {
            let params: EchoParams = request.parse()?;
            Ok(ToolOutput::Text(params.count.to_string()))
        }
    }

    #[tokio::test]
    async fn test_arguments_are_coerced_before_dispatch() {
        let registry = ToolRegistry::new(vec![Arc::new(Echo)]);
        let output = registry.call("echo", &json!({"count": "7"})).await.unwrap();
        assert_eq!(output, ToolOutput::Text("7".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_tool_lists_available() {
        let registry = ToolRegistry::new(vec![Arc::new(Echo)]);
        let err = registry.call("shout", &json!({})).await.unwrap_err();
        assert!(matches!(err, TypecastError::UnknownTool(_)));
        assert!(err.to_string().contains("echo"));
    }

    #[tokio::test]
    async fn test_undecodable_argument_is_named() {
        let registry = ToolRegistry::new(vec![Arc::new(Echo)]);
        let err = registry
            .call("echo", &json!({"count": "many"}))
            .await
            .unwrap_err();
        assert!(
            matches!(&err, TypecastError::Validation { field, .. } if field == "count"),
            "{err:?}"
        );
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_definitions_are_sorted_by_name() {
        let registry = ToolRegistry::new(vec![Arc::new(Echo), Arc::new(KnowledgeTool)]);
        let names: Vec<_> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["echo", "get_typecast_knowledge"]);
    }
}
