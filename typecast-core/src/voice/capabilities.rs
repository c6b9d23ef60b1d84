use super::types::{EmotionPreset, TtsModel};

/// What a model accepts in the `prompt` section of a synthesis request.
/// All model-specific validation policy lives in this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCapabilities {
    pub model: TtsModel,
    pub presets: &'static [EmotionPreset],
    pub smart_emotion: bool,
    /// Older models take a bare `{emotion_preset, emotion_intensity}` prompt;
    /// newer ones expect it tagged with `emotion_type`.
    pub tagged_prompt: bool,
}

const BASE_PRESETS: &[EmotionPreset] = &[
    EmotionPreset::Normal,
    EmotionPreset::Happy,
    EmotionPreset::Sad,
    EmotionPreset::Angry,
];

const EXTENDED_PRESETS: &[EmotionPreset] = &[
    EmotionPreset::Normal,
    EmotionPreset::Happy,
    EmotionPreset::Sad,
    EmotionPreset::Angry,
    EmotionPreset::Whisper,
    EmotionPreset::ToneUp,
    EmotionPreset::ToneDown,
];

static CAPABILITIES: [ModelCapabilities; 2] = [
    ModelCapabilities {
        model: TtsModel::SsfmV21,
        presets: BASE_PRESETS,
        smart_emotion: false,
        tagged_prompt: false,
    },
    ModelCapabilities {
        model: TtsModel::SsfmV30,
        presets: EXTENDED_PRESETS,
        smart_emotion: true,
        tagged_prompt: true,
    },
];

pub fn capabilities(model: TtsModel) -> &'static ModelCapabilities {
    CAPABILITIES
        .iter()
        .find(|caps| caps.model == model)
        .unwrap_or(&CAPABILITIES[0])
}

pub fn all_capabilities() -> &'static [ModelCapabilities] {
    &CAPABILITIES
}

impl ModelCapabilities {
    pub fn supports_preset(&self, preset: EmotionPreset) -> bool {
        self.presets.contains(&preset)
    }

    pub fn preset_names(&self) -> Vec<&'static str> {
        self.presets.iter().map(|p| (*p).into()).collect()
    }

    /// Models that accept `preset`
    pub fn models_supporting_preset(preset: EmotionPreset) -> Vec<TtsModel> {
        CAPABILITIES
            .iter()
            .filter(|caps| caps.supports_preset(preset))
            .map(|caps| caps.model)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::VariantArray;

    #[test]
    fn test_every_model_has_an_entry() {
        for model in TtsModel::VARIANTS {
            assert_eq!(capabilities(*model).model, *model);
        }
    }

    #[test]
    fn test_newer_model_has_seven_presets_and_smart() {
        let caps = capabilities(TtsModel::SsfmV30);
        assert_eq!(caps.presets.len(), 7);
        assert!(caps.smart_emotion);
        for preset in EmotionPreset::VARIANTS {
            assert!(caps.supports_preset(*preset));
        }
    }

    #[test]
    fn test_extended_presets_only_on_newer_model() {
        let caps = capabilities(TtsModel::SsfmV21);
        assert!(!caps.smart_emotion);
        for preset in [
            EmotionPreset::Whisper,
            EmotionPreset::ToneUp,
            EmotionPreset::ToneDown,
        ] {
            assert!(!caps.supports_preset(preset));
            assert_eq!(
                ModelCapabilities::models_supporting_preset(preset),
                vec![TtsModel::SsfmV30]
            );
        }
        assert_eq!(caps.preset_names(), vec!["normal", "happy", "sad", "angry"]);
    }
}
