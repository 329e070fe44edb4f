//! Text-to-speech port

/// Fire-and-forget playback of generated text.
///
/// Implementations must return promptly; playback runs in the background and
/// failures are theirs to log.
pub trait SpeechPort: Send + Sync {
    fn speak(&self, text: &str, actor_id: &str);
}

/// Silent implementation for when speech is unavailable
pub struct NoSpeech;

impl SpeechPort for NoSpeech {
    fn speak(&self, _text: &str, _actor_id: &str) {}
}
