use std::sync::Arc;

use base64::Engine;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, TypecastError};

/// Request passed to tool execution
#[derive(Debug, Clone)]
pub struct ToolRequest {
    /// Arguments, already coerced to the tool's input schema
    pub arguments: Value,
}

impl ToolRequest {
    pub fn new(arguments: Value) -> Self {
        Self { arguments }
    }

    /// Decode the arguments into the tool's parameter struct. Missing
    /// arguments decode like an empty object. Decode failures name the
    /// offending field whenever serde can locate it.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        let arguments = match &self.arguments {
            Value::Null => Value::Object(Default::default()),
            other => other.clone(),
        };
        serde_path_to_error::deserialize(arguments).map_err(|e| {
            let path = e.path().to_string();
            let inner = e.into_inner().to_string();
            if path != "." {
                return TypecastError::validation(path, inner);
            }
            match missing_field(&inner) {
                Some(field) => TypecastError::validation(field, "is required"),
                None => TypecastError::InvalidArguments(inner),
            }
        })
    }
}

/// Field named by serde's "missing field `x`" message. Those errors are
/// raised on the enclosing struct, so the path alone does not carry it.
fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")?
        .split('`')
        .next()
        .filter(|field| !field.is_empty())
}

/// Result from tool execution
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Plain message for the caller
    Text(String),
    /// Structured data, rendered as pretty JSON
    Json(Value),
    /// Audio returned inline instead of being saved
    Audio {
        data: Vec<u8>,
        mime_type: &'static str,
    },
}

impl ToolOutput {
    /// Text form sent back over MCP. Inline audio becomes a base64 data URI.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Self::Audio { data, mime_type } => format!(
                "data:{mime_type};base64,{}",
                base64::engine::general_purpose::STANDARD.encode(data)
            ),
        }
    }
}

#[async_trait::async_trait]
pub trait ToolExecutor: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> Value;

    async fn call(&self, request: &ToolRequest) -> Result<ToolOutput>;
}

pub type SharedTool = Arc<dyn ToolExecutor>;
