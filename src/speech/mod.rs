//! Pronunciation playback
//!
//! This module provides the [`SpeechPlayer`] fallback chain together with the
//! local synthesizer, remote text-to-speech and audio sink it is built from.

pub mod player;
pub mod remote;
pub mod sink;
pub mod synthesizer;

use std::process::Stdio;

use tokio::process::Command;

pub use player::{SpeechOutcome, SpeechPlayer};
pub use remote::RemoteTts;
pub use sink::{AudioSink, CommandSink};
pub use synthesizer::{
    parse_espeak_voices, select_chinese_voice, EspeakSynthesizer, Utterance, Voice,
    VoiceSynthesizer,
};

/// Command for a child process that reads its input from a pipe
///
/// The child is killed when its handle is dropped, so a failed write or a
/// discarded player never leaves it running.
pub(crate) fn piped_command(program: &str) -> Command {
    let mut command = Command::new(program);
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    command
}
