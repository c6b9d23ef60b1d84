use std::path::Path;

use serde_json::Value;

use crate::error::Result;
use crate::playback::AudioPlayer;
use crate::speech::PlayAudioParams;
use crate::tools::r#trait::{ToolExecutor, ToolOutput, ToolRequest};
use crate::tools::schema::input_schema_for;

pub struct PlayAudioTool {
    player: AudioPlayer,
}

impl PlayAudioTool {
    pub fn new(player: AudioPlayer) -> Self {
        Self { player }
    }
}

#[async_trait::async_trait]
impl ToolExecutor for PlayAudioTool {
    fn name(&self) -> &'static str {
        "play_audio"
    }

    fn description(&self) -> &'static str {
        "Play a generated audio file (WAV or MP3). Uses ffplay when available and falls back \
         to the default output device for WAV files."
    }

    fn input_schema(&self) -> Value {
        input_schema_for::<PlayAudioParams>()
    }

    async fn call(&self, request: &ToolRequest) -> Result<ToolOutput> {
        let params: PlayAudioParams = request.parse()?;
        let path = Path::new(params.validate()?);

        let method = self.player.play_file(path, params.use_ffmpeg).await?;
        Ok(ToolOutput::Text(format!(
            "Successfully played audio file using {method}: {}",
            path.display()
        )))
    }
}
