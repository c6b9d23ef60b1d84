pub mod provider;
pub mod typecast;


pub use provider::SpeechApi;
pub use typecast::TypecastClient;
