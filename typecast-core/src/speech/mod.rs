pub mod params;
pub mod request;


pub use params::{GetVoiceParams, GetVoicesParams, PlayAudioParams, TextToSpeechParams};
pub use request::{EmotionSpec, OutputSettings, Prompt, SynthesisRequest, SynthesizedAudio};
