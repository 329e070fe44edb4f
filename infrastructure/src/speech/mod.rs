//! Text-to-speech adapters

mod command;

pub use command::{CommandSpeech, SpeechProgram};
