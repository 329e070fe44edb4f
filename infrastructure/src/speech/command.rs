//! Speech through a locally installed command-line synthesizer.
//!
//! Utterances are queued to a single background task and played one after
//! another, so `speak` returns immediately and voices never overlap.

use legion_application::ports::speech::SpeechPort;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// Supported synthesizers, in detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechProgram {
    EspeakNg,
    Espeak,
    Say,
}

impl SpeechProgram {
    const ALL: [SpeechProgram; 3] = [
        SpeechProgram::EspeakNg,
        SpeechProgram::Espeak,
        SpeechProgram::Say,
    ];

    pub fn command(&self) -> &'static str {
        match self {
            SpeechProgram::EspeakNg => "espeak-ng",
            SpeechProgram::Espeak => "espeak",
            SpeechProgram::Say => "say",
        }
    }

    fn voices(&self) -> &'static [&'static str] {
        match self {
            SpeechProgram::EspeakNg | SpeechProgram::Espeak => &[
                "en+m1", "en+m3", "en+m5", "en+m7", "en+f1", "en+f2", "en+f3", "en+f4",
            ],
            SpeechProgram::Say => &[
                "Alex", "Daniel", "Fred", "Karen", "Moira", "Samantha", "Tessa", "Victoria",
            ],
        }
    }

    fn args(&self, voice: &str, text: &str) -> Vec<String> {
        vec!["-v".to_string(), voice.to_string(), text.to_string()]
    }
}

struct Utterance {
    voice: &'static str,
    text: String,
}

pub struct CommandSpeech {
    program: SpeechProgram,
    queue: UnboundedSender<Utterance>,
}

impl CommandSpeech {
    /// Use the first synthesizer found on `PATH`
    pub fn detect() -> Option<Self> {
        SpeechProgram::ALL.iter().find_map(|program| {
            which::which(program.command())
                .ok()
                .map(|path| Self::with_program(*program, path))
        })
    }

    /// Start the playback task on the current tokio runtime.
    ///
    /// Outside a runtime the queue has no consumer and utterances are dropped.
    pub fn with_program(program: SpeechProgram, path: PathBuf) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel::<Utterance>();
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(play_queue(program, path, receiver));
                debug!("Speech through {}", program.command());
            }
            Err(e) => warn!("Speech disabled, no async runtime: {}", e),
        }

        Self {
            program,
            queue: sender,
        }
    }

    pub fn program(&self) -> SpeechProgram {
        self.program
    }

    /// The voice assigned to `actor_id`, the same on every run
    pub fn voice_for(&self, actor_id: &str) -> &'static str {
        let voices = self.program.voices();
        voices[(stable_hash(actor_id) % voices.len() as u64) as usize]
    }
}

impl SpeechPort for CommandSpeech {
    fn speak(&self, text: &str, actor_id: &str) {
        let utterance = Utterance {
            voice: self.voice_for(actor_id),
            text: text.to_string(),
        };
        if self.queue.send(utterance).is_err() {
            warn!("Speech task is gone, dropping utterance");
        }
    }
}

async fn play_queue(
    program: SpeechProgram,
    path: PathBuf,
    mut receiver: UnboundedReceiver<Utterance>,
) {
    while let Some(utterance) = receiver.recv().await {
        let status = Command::new(&path)
            .args(program.args(utterance.voice, &utterance.text))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        match status {
            Ok(status) if !status.success() => {
                debug!("{} exited with {}", program.command(), status)
            }
            Ok(_) => {}
            Err(e) => warn!("Speech playback failed: {}", e),
        }
    }
}

/// FNV-1a, so voice assignment survives restarts
fn stable_hash(s: &str) -> u64 {
    s.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}
