pub mod fuzzy_json;
pub mod get_voice;
pub mod get_voices;
pub mod knowledge;
pub mod play_audio;
pub mod registry;
pub mod schema;
pub mod text_to_speech;
pub mod r#trait;

pub use r#trait::{SharedTool, ToolExecutor, ToolOutput, ToolRequest};
pub use registry::{ToolDefinition, ToolRegistry};
