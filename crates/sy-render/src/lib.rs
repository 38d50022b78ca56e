//! Terminal display sinks for syncscii.
//!
//! Canvas texte, barre de statut, compteur FPS et sommeil réactif au clavier.

pub mod canvas;
pub mod fps;
pub mod input;
pub mod terminal;
pub mod ui;

pub use input::KeyboardSleeper;
pub use terminal::{PlainSink, TuiSink};
