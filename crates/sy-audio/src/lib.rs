// Audio decoding and playback device for syncscii.

pub mod decode;
pub mod error;
pub mod player;

pub use error::AudioError;
pub use player::AudioPlayer;
