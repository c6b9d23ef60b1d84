//! Tool argument shapes and their validation. Schemas for MCP clients are
//! derived from these structs; `validate` enforces the same constraints
//! before anything is sent upstream.

use schemars::JsonSchema;
use serde::Deserialize;

use super::request::{EmotionSpec, OutputSettings, Prompt, SynthesisRequest};
use crate::error::{Result, TypecastError};
use crate::voice::types::parse_choice;
use crate::voice::{
    capabilities, Age, AudioFormat, EmotionPreset, EmotionType, Gender, ModelCapabilities,
    TtsModel, VoiceFilter,
};

pub const MAX_TEXT_CHARS: usize = 5000;
pub const MIN_INTENSITY: f64 = 0.0;
pub const MAX_INTENSITY: f64 = 2.0;
pub const DEFAULT_INTENSITY: f64 = 1.0;
pub const MAX_SEED: i64 = 2_147_483_647;

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetVoicesParams {
    /// Only list voices that support this TTS model
    #[serde(default)]
    #[schemars(with = "Option<TtsModel>")]
    pub model: Option<String>,

    /// Only list voices of this gender
    #[serde(default)]
    #[schemars(with = "Option<Gender>")]
    pub gender: Option<String>,

    /// Only list voices of this age group
    #[serde(default)]
    #[schemars(with = "Option<Age>")]
    pub age: Option<String>,
}

impl GetVoicesParams {
    pub fn validate(&self) -> Result<VoiceFilter> {
        Ok(VoiceFilter {
            model: optional_choice("model", self.model.as_deref())?,
            gender: optional_choice("gender", self.gender.as_deref())?,
            age: optional_choice("age", self.age.as_deref())?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetVoiceParams {
    /// Voice identifier, e.g. "tc_62a8975e695ad26f7fb514d1"
    pub voice_id: String,
}

impl GetVoiceParams {
    pub fn validate(&self) -> Result<&str> {
        non_blank("voice_id", &self.voice_id)
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TextToSpeechParams {
    /// Voice identifier to use (see get_voices)
    pub voice_id: String,

    /// Text to convert to speech (max 5000 characters)
    #[schemars(length(min = 1, max = 5000))]
    pub text: String,

    /// TTS model to use. Smart emotion and the whisper/toneup/tonedown presets
    /// require ssfm-v30
    #[schemars(with = "TtsModel")]
    pub model: String,

    /// "preset" applies emotion_preset at emotion_intensity; "smart" lets the
    /// model infer emotion from previous_text/next_text (ssfm-v30 only)
    #[serde(default = "default_emotion_type")]
    #[schemars(with = "EmotionType")]
    pub emotion_type: String,

    /// Emotion preset when emotion_type is "preset" (default: normal)
    #[serde(default)]
    #[schemars(with = "Option<EmotionPreset>")]
    pub emotion_preset: Option<String>,

    /// Intensity of the preset emotion, between 0.0 and 2.0 (default: 1.0)
    #[serde(default)]
    #[schemars(range(min = 0.0, max = 2.0))]
    pub emotion_intensity: Option<f64>,

    /// Text spoken before this one, used by smart emotion
    #[serde(default)]
    pub previous_text: Option<String>,

    /// Text spoken after this one, used by smart emotion
    #[serde(default)]
    pub next_text: Option<String>,

    /// ISO 639-3 language code such as "eng" or "kor" (auto-detected if omitted)
    #[serde(default)]
    #[schemars(regex(pattern = r"^[A-Za-z]{3}$"))]
    pub language: Option<String>,

    /// Audio volume level, between 0 and 200
    #[serde(default = "default_volume")]
    #[schemars(range(min = 0, max = 200))]
    pub volume: i64,

    /// Audio pitch adjustment in semitones, between -12 and 12
    #[serde(default)]
    #[schemars(range(min = -12, max = 12))]
    pub audio_pitch: i64,

    /// Audio playback speed, between 0.5 and 2.0
    #[serde(default = "default_tempo")]
    #[schemars(range(min = 0.5, max = 2.0))]
    pub audio_tempo: f64,

    /// Audio file format
    #[serde(default = "default_audio_format")]
    #[schemars(with = "AudioFormat")]
    pub audio_format: String,

    /// Random seed for reproducible generation
    #[serde(default)]
    #[schemars(range(min = 0, max = 2147483647))]
    pub seed: Option<i64>,

    /// Return the audio inline (base64) instead of saving it to the output directory
    #[serde(default)]
    pub return_audio: bool,
}

fn default_emotion_type() -> String {
    "preset".to_string()
}

fn default_volume() -> i64 {
    100
}

fn default_tempo() -> f64 {
    1.0
}

fn default_audio_format() -> String {
    "wav".to_string()
}

impl TextToSpeechParams {
    /// Minimal arguments with every optional field at its default
    pub fn new(
        voice_id: impl Into<String>,
        text: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            voice_id: voice_id.into(),
            text: text.into(),
            model: model.into(),
            emotion_type: default_emotion_type(),
            emotion_preset: None,
            emotion_intensity: None,
            previous_text: None,
            next_text: None,
            language: None,
            volume: default_volume(),
            audio_pitch: 0,
            audio_tempo: default_tempo(),
            audio_format: default_audio_format(),
            seed: None,
            return_audio: false,
        }
    }

    pub fn validate(&self) -> Result<SynthesisRequest> {
        let voice_id = non_blank("voice_id", &self.voice_id)?.to_string();

        if self.text.trim().is_empty() {
            return Err(TypecastError::validation("text", "must not be empty"));
        }
        let chars = self.text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(TypecastError::validation(
                "text",
                format!("is {chars} characters long; the maximum is {MAX_TEXT_CHARS}"),
            ));
        }

        let model: TtsModel = parse_choice("model", &self.model)?;
        let caps = capabilities(model);
        let emotion = self.validate_emotion(caps)?;

        let language = match self.language.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(code) if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) => {
                Some(code.to_ascii_lowercase())
            }
            Some(code) => {
                return Err(TypecastError::validation(
                    "language",
                    format!("'{code}' is not a three-letter ISO 639-3 code"),
                ))
            }
        };

        let output = OutputSettings {
            volume: in_range("volume", self.volume, 0, 200)? as u16,
            audio_pitch: in_range("audio_pitch", self.audio_pitch, -12, 12)? as i8,
            audio_tempo: in_float_range("audio_tempo", self.audio_tempo, 0.5, 2.0)?,
            audio_format: parse_choice::<AudioFormat>("audio_format", &self.audio_format)?,
        };

        let seed = match self.seed {
            Some(seed) => Some(in_range("seed", seed, 0, MAX_SEED)? as u32),
            None => None,
        };

        Ok(SynthesisRequest {
            voice_id,
            text: self.text.clone(),
            model,
            language,
            prompt: Prompt::for_model(model, emotion),
            output,
            seed,
        })
    }

    fn validate_emotion(&self, caps: &ModelCapabilities) -> Result<EmotionSpec> {
        // Intensity bounds hold for every model and emotion type.
        if let Some(intensity) = self.emotion_intensity {
            in_float_range("emotion_intensity", intensity, MIN_INTENSITY, MAX_INTENSITY)?;
        }

        let previous_text = non_empty(self.previous_text.as_deref());
        let next_text = non_empty(self.next_text.as_deref());

        match parse_choice::<EmotionType>("emotion_type", &self.emotion_type)? {
            EmotionType::Preset => {
                if previous_text.is_some() {
                    return Err(TypecastError::validation(
                        "previous_text",
                        "is only used with emotion_type \"smart\"",
                    ));
                }
                if next_text.is_some() {
                    return Err(TypecastError::validation(
                        "next_text",
                        "is only used with emotion_type \"smart\"",
                    ));
                }

                let preset = match self.emotion_preset.as_deref() {
                    Some(raw) => parse_choice::<EmotionPreset>("emotion_preset", raw)?,
                    None => EmotionPreset::Normal,
                };
                if !caps.supports_preset(preset) {
                    let supported_by = ModelCapabilities::models_supporting_preset(preset)
                        .iter()
                        .map(|m| m.to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(TypecastError::validation(
                        "emotion_preset",
                        format!(
                            "'{preset}' is not available for {}; use one of: {} (or switch to {supported_by})",
                            caps.model,
                            caps.preset_names().join(", ")
                        ),
                    ));
                }

                Ok(EmotionSpec::Preset {
                    emotion_preset: preset,
                    emotion_intensity: self.emotion_intensity.unwrap_or(DEFAULT_INTENSITY),
                })
            }
            EmotionType::Smart => {
                if !caps.smart_emotion {
                    return Err(TypecastError::validation(
                        "emotion_type",
                        format!("smart emotion is not available for {}", caps.model),
                    ));
                }
                if self.emotion_preset.is_some() {
                    return Err(TypecastError::validation(
                        "emotion_preset",
                        "is only used with emotion_type \"preset\"",
                    ));
                }
                if self.emotion_intensity.is_some() {
                    return Err(TypecastError::validation(
                        "emotion_intensity",
                        "is only used with emotion_type \"preset\"",
                    ));
                }

                Ok(EmotionSpec::Smart {
                    previous_text: previous_text.map(str::to_string),
                    next_text: next_text.map(str::to_string),
                })
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PlayAudioParams {
    /// Path to the audio file to play
    pub file_path: String,

    /// Prefer ffplay (from ffmpeg); falls back to the default output device
    /// when ffplay is not available
    #[serde(default = "default_use_ffmpeg")]
    pub use_ffmpeg: bool,
}

fn default_use_ffmpeg() -> bool {
    true
}

impl PlayAudioParams {
    pub fn validate(&self) -> Result<&str> {
        non_blank("file_path", &self.file_path)
    }
}

/// Tool that takes no arguments
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

fn optional_choice<T>(field: &str, value: Option<&str>) -> Result<Option<T>>
where
    T: std::str::FromStr + strum::VariantArray + Copy + Into<&'static str>,
{
    match non_empty(value) {
        Some(raw) => parse_choice(field, raw).map(Some),
        None => Ok(None),
    }
}

fn non_blank<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypecastError::validation(field, "must not be empty"));
    }
    Ok(trimmed)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn in_range(field: &str, value: i64, min: i64, max: i64) -> Result<i64> {
    if !(min..=max).contains(&value) {
        return Err(TypecastError::validation(
            field,
            format!("{value} is outside the allowed range {min}..={max}"),
        ));
    }
    Ok(value)
}

fn in_float_range(field: &str, value: f64, min: f64, max: f64) -> Result<f64> {
    if !value.is_finite() || value < min || value > max {
        return Err(TypecastError::validation(
            field,
            format!("{value} is outside the allowed range [{min}, {max}]"),
        ));
    }
    Ok(value)
}
