pub mod client;
pub mod error;
pub mod knowledge;
pub mod output;
pub mod playback;
pub mod settings;
pub mod speech;
pub mod tools;
pub mod voice;

pub use error::{Result, TypecastError};
pub use settings::Settings;
