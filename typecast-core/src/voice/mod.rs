//! Voice and model vocabulary shared by validation, the upstream client and
//! the tool schemas.

pub mod capabilities;
pub mod types;

pub use capabilities::{capabilities, ModelCapabilities};
pub use types::{
    AudioFormat, Age, EmotionPreset, EmotionType, Gender, TtsModel, Voice, VoiceFilter,
    VoiceModel,
};
