use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::VariantArray;

use crate::error::{Result, TypecastError};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::Display,
    strum::VariantArray,
)]
#[strum(ascii_case_insensitive)]
pub enum TtsModel {
    #[serde(rename = "ssfm-v21")]
    #[strum(serialize = "ssfm-v21")]
    SsfmV21,
    #[serde(rename = "ssfm-v30")]
    #[strum(serialize = "ssfm-v30")]
    SsfmV30,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::Display,
    strum::VariantArray,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Gender {
    Male,
    Female,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::Display,
    strum::VariantArray,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Age {
    Child,
    Teenager,
    YoungAdult,
    MiddleAge,
    Elder,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::Display,
    strum::VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmotionPreset {
    Normal,
    Happy,
    Sad,
    Angry,
    Whisper,
    #[serde(rename = "toneup")]
    #[strum(serialize = "toneup")]
    ToneUp,
    #[serde(rename = "tonedown")]
    #[strum(serialize = "tonedown")]
    ToneDown,
}

/// How the upstream model decides the emotion of the generated speech
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::Display,
    strum::VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmotionType {
    /// A fixed emotion label with an intensity
    #[default]
    Preset,
    /// Emotion inferred from the surrounding text
    Smart,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::Display,
    strum::VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AudioFormat {
    #[default]
    Wav,
    Mp3,
}

impl AudioFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
        }
    }

    /// Recognise the format from a `Content-Type` header value. Generic types
    /// such as `application/octet-stream` return `None`.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "audio/wav" | "audio/wave" | "audio/x-wav" | "audio/vnd.wave" => Some(Self::Wav),
            "audio/mpeg" | "audio/mp3" | "audio/x-mpeg" | "audio/mpeg3" => Some(Self::Mp3),
            _ => None,
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::from_str(extension).ok()
    }
}

/// Parse a user-supplied string into one of a fixed set of values, naming the
/// field and the accepted values on failure.
pub fn parse_choice<T>(field: &str, value: &str) -> Result<T>
where
    T: FromStr + VariantArray + Copy + Into<&'static str>,
{
    T::from_str(value.trim()).map_err(|_| {
        TypecastError::validation(
            field,
            format!("'{value}' is not one of: {}", choices::<T>().join(", ")),
        )
    })
}

pub fn choices<T>() -> Vec<&'static str>
where
    T: VariantArray + Copy + Into<&'static str>,
{
    T::VARIANTS.iter().map(|v| (*v).into()).collect()
}

/// Per-model entry of a voice record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceModel {
    pub version: String,
    #[serde(default)]
    pub emotions: Vec<String>,
}

/// Voice record as returned by the Typecast API. Only the identity is
/// typed; every other field, explicit nulls included, stays in `extra` so
/// records round-trip unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    pub voice_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Voice {
    pub fn gender(&self) -> Option<&str> {
        self.extra.get("gender").and_then(Value::as_str)
    }

    pub fn age(&self) -> Option<&str> {
        self.extra.get("age").and_then(Value::as_str)
    }

    /// Models this voice supports. Missing, null or malformed entries read
    /// as no models.
    pub fn models(&self) -> Vec<VoiceModel> {
        self.extra
            .get("models")
            .cloned()
            .and_then(|models| serde_json::from_value(models).ok())
            .unwrap_or_default()
    }
}

/// Optional filters for listing voices. Only the filters that are set are
/// sent upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoiceFilter {
    pub model: Option<TtsModel>,
    pub gender: Option<Gender>,
    pub age: Option<Age>,
}

impl VoiceFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, &'static str)> {
        let mut pairs: Vec<(&'static str, &'static str)> = Vec::new();
        if let Some(model) = self.model {
            pairs.push(("model", model.into()));
        }
        if let Some(gender) = self.gender {
            pairs.push(("gender", gender.into()));
        }
        if let Some(age) = self.age {
            pairs.push(("age", age.into()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_names_match_wire_format() {
        assert_eq!(TtsModel::SsfmV21.to_string(), "ssfm-v21");
        assert_eq!(
            serde_json::to_value(TtsModel::SsfmV30).unwrap(),
            json!("ssfm-v30")
        );
        assert_eq!(
            parse_choice::<TtsModel>("model", "SSFM-V30").unwrap(),
            TtsModel::SsfmV30
        );
    }

    #[test]
    fn test_parse_choice_lists_accepted_values() {
        let err = parse_choice::<Age>("age", "baby").unwrap_err();
        match err {
            TypecastError::Validation { field, message } => {
                assert_eq!(field, "age");
                assert!(message.contains("young_adult"));
                assert!(message.contains("'baby'"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_emotion_wire_names() {
        assert_eq!(
            serde_json::to_value(EmotionPreset::ToneUp).unwrap(),
            json!("toneup")
        );
        assert_eq!(
            parse_choice::<EmotionPreset>("emotion_preset", "tonedown").unwrap(),
            EmotionPreset::ToneDown
        );
    }

    #[test]
    fn test_audio_format_from_content_type() {
        assert_eq!(
            AudioFormat::from_content_type("audio/wav"),
            Some(AudioFormat::Wav)
        );
        assert_eq!(
            AudioFormat::from_content_type("audio/mpeg; charset=binary"),
            Some(AudioFormat::Mp3)
        );
        assert_eq!(AudioFormat::from_content_type("application/octet-stream"), None);
        assert_eq!(AudioFormat::Mp3.extension(), "mp3");
    }

    #[test]
    fn test_voice_record_preserves_unknown_fields() {
        let raw = json!({
            "voice_id": "tc_123",
            "voice_name": "Olivia",
            "gender": "female",
            "models": [{"version": "ssfm-v30", "emotions": ["normal", "happy"]}],
            "thumbnail": "https://example.com/olivia.png"
        });

        let voice: Voice = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(voice.voice_name, "Olivia");
        assert_eq!(voice.gender(), Some("female"));
        assert_eq!(voice.extra.get("thumbnail"), raw.get("thumbnail"));
        assert_eq!(
            voice.models(),
            vec![VoiceModel {
                version: "ssfm-v30".to_string(),
                emotions: vec!["normal".to_string(), "happy".to_string()],
            }]
        );
        assert_eq!(serde_json::to_value(&voice).unwrap(), raw);

        let sparse = json!({
            "voice_id": "tc_1",
            "voice_name": "A",
            "gender": null,
            "age": null,
            "use_cases": null,
            "models": [{"version": "ssfm-v21"}]
        });
        let voice: Voice = serde_json::from_value(sparse.clone()).unwrap();
        assert_eq!(voice.gender(), None);
        assert_eq!(voice.age(), None);
        assert_eq!(voice.models()[0].emotions, Vec::<String>::new());
        assert_eq!(serde_json::to_value(&voice).unwrap(), sparse);
    }

    #[test]
    fn test_filter_query_pairs_only_include_set_filters() {
        assert!(VoiceFilter::default().query_pairs().is_empty());

        let filter = VoiceFilter {
            model: None,
            gender: Some(Gender::Female),
            age: Some(Age::MiddleAge),
        };
        assert_eq!(
            filter.query_pairs(),
            vec![("gender", "female"), ("age", "middle_age")]
        );
    }
}
