use serde::Serialize;

use crate::voice::{capabilities, AudioFormat, EmotionPreset, TtsModel};

/// Emotion control for one synthesis call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "emotion_type", rename_all = "lowercase")]
pub enum EmotionSpec {
    Preset {
        emotion_preset: EmotionPreset,
        emotion_intensity: f64,
    },
    Smart {
        #[serde(skip_serializing_if = "Option::is_none")]
        previous_text: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        next_text: Option<String>,
    },
}

/// The `prompt` object of the request body. Its shape depends on the model,
/// see [`crate::voice::ModelCapabilities::tagged_prompt`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Prompt {
    Legacy {
        emotion_preset: EmotionPreset,
        emotion_intensity: f64,
    },
    Tagged(EmotionSpec),
}

impl Prompt {
    pub fn for_model(model: TtsModel, emotion: EmotionSpec) -> Self {
        match emotion {
            EmotionSpec::Preset {
                emotion_preset,
                emotion_intensity,
            } if !capabilities(model).tagged_prompt => Self::Legacy {
                emotion_preset,
                emotion_intensity,
            },
            emotion => Self::Tagged(emotion),
        }
    }

    pub fn emotion(&self) -> EmotionSpec {
        match self {
            Self::Legacy {
                emotion_preset,
                emotion_intensity,
            } => EmotionSpec::Preset {
                emotion_preset: *emotion_preset,
                emotion_intensity: *emotion_intensity,
            },
            Self::Tagged(spec) => spec.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSettings {
    pub volume: u16,
    pub audio_pitch: i8,
    pub audio_tempo: f64,
    pub audio_format: AudioFormat,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            volume: 100,
            audio_pitch: 0,
            audio_tempo: 1.0,
            audio_format: AudioFormat::Wav,
        }
    }
}

/// Validated body of `POST /v1/text-to-speech`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisRequest {
    pub voice_id: String,
    pub text: String,
    pub model: TtsModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub prompt: Prompt,
    pub output: OutputSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

/// Audio returned by a synthesis call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub data: Vec<u8>,
    pub format: AudioFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(model: TtsModel, emotion: EmotionSpec) -> SynthesisRequest {
        SynthesisRequest {
            voice_id: "tc_1".to_string(),
            text: "Hello".to_string(),
            model,
            language: None,
            prompt: Prompt::for_model(model, emotion),
            output: OutputSettings::default(),
            seed: None,
        }
    }

    #[test]
    fn test_older_model_sends_untagged_prompt() {
        let body = serde_json::to_value(request(
            TtsModel::SsfmV21,
            EmotionSpec::Preset {
                emotion_preset: EmotionPreset::Happy,
                emotion_intensity: 1.5,
            },
        ))
        .unwrap();

        assert_eq!(
            body,
            json!({
                "voice_id": "tc_1",
                "text": "Hello",
                "model": "ssfm-v21",
                "prompt": {"emotion_preset": "happy", "emotion_intensity": 1.5},
                "output": {
                    "volume": 100,
                    "audio_pitch": 0,
                    "audio_tempo": 1.0,
                    "audio_format": "wav"
                }
            })
        );
    }

    #[test]
    fn test_newer_model_tags_preset_prompt() {
        let body = serde_json::to_value(request(
            TtsModel::SsfmV30,
            EmotionSpec::Preset {
                emotion_preset: EmotionPreset::Whisper,
                emotion_intensity: 0.5,
            },
        ))
        .unwrap();

        assert_eq!(
            body["prompt"],
            json!({"emotion_type": "preset", "emotion_preset": "whisper", "emotion_intensity": 0.5})
        );
    }

    #[test]
    fn test_smart_prompt_omits_missing_context() {
        let body = serde_json::to_value(request(
            TtsModel::SsfmV30,
            EmotionSpec::Smart {
                previous_text: Some("It was raining.".to_string()),
                next_text: None,
            },
        ))
        .unwrap();

        assert_eq!(
            body["prompt"],
            json!({"emotion_type": "smart", "previous_text": "It was raining."})
        );
    }

    #[test]
    fn test_prompt_emotion_round_trips_for_legacy() {
        let spec = EmotionSpec::Preset {
            emotion_preset: EmotionPreset::Sad,
            emotion_intensity: 2.0,
        };
        let prompt = Prompt::for_model(TtsModel::SsfmV21, spec.clone());
        assert!(matches!(prompt, Prompt::Legacy { .. }));
        assert_eq!(prompt.emotion(), spec);
    }
}
