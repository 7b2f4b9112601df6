//! Audio output for fetched pronunciation clips

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Child;
use tokio::sync::Mutex;

use crate::config::SpeechConfig;
use crate::error::{Result, TutorError};
use crate::speech::piped_command;

/// Destination for encoded audio
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Start playing an encoded clip, replacing any clip still playing
    ///
    /// # Errors
    ///
    /// Returns error if the audio could not be handed to the output
    async fn play(&self, audio: Vec<u8>) -> Result<()>;

    /// Wait for the current clip to finish
    async fn wait(&self) -> Result<()> {
        Ok(())
    }
}

/// Plays audio by piping it into an external player such as `ffplay`
#[derive(Debug)]
pub struct CommandSink {
    program: String,
    args: Vec<String>,
    current: Mutex<Option<Child>>,
}

impl CommandSink {
    /// Create a sink for a player command
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            current: Mutex::new(None),
        }
    }

    /// Create the sink described by the speech configuration
    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(config.player.clone(), config.player_args.clone())
    }
}

#[async_trait]
impl AudioSink for CommandSink {
    async fn play(&self, audio: Vec<u8>) -> Result<()> {
        let mut current = self.current.lock().await;
        if let Some(mut previous) = current.take() {
            let _ = previous.kill().await;
        }

        let mut child = piped_command(&self.program)
            .args(&self.args)
            .spawn()
            .map_err(|e| {
                TutorError::Playback(format!("Failed to start {}: {}", self.program, e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TutorError::Playback("player stdin unavailable".to_string()))?;
        *current = Some(child);
        drop(current);

        stdin
            .write_all(&audio)
            .await
            .map_err(|e| TutorError::Playback(format!("Failed to send audio: {}", e)))?;
        tracing::debug!("Sent {} bytes to {}", audio.len(), self.program);
        Ok(())
    }

    async fn wait(&self) -> Result<()> {
        let child = self.current.lock().await.take();
        if let Some(mut child) = child {
            let status = child.wait().await?;
            if !status.success() {
                return Err(TutorError::Playback(format!(
                    "{} exited with {}",
                    self.program, status
                ))
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_player_is_playback_error() {
        let sink = CommandSink::new("hanyu-tutor-no-such-player", vec![]);
        let err = sink.play(vec![1, 2, 3]).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TutorError>(),
            Some(TutorError::Playback(_))
        ));
    }

    #[cfg(target_os = "linux")]
    fn process_running(pid: u32) -> bool {
        match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
            // state follows the parenthesised command name; Z is an unreaped zombie
            Ok(stat) => stat
                .rsplit_once(')')
                .and_then(|(_, rest)| rest.split_whitespace().next())
                .is_some_and(|state| state != "Z"),
            Err(_) => false,
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_dropping_sink_kills_player() {
        let sink = CommandSink::new("sleep", vec!["30".to_string()]);
        sink.play(vec![1, 2, 3]).await.unwrap();
        let pid = sink
            .current
            .lock()
            .await
            .as_ref()
            .and_then(Child::id)
            .expect("player should be running");
        assert!(process_running(pid));

        drop(sink);

        let mut running = true;
        for _ in 0..40 {
            running = process_running(pid);
            if !running {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        assert!(!running, "player process {} survived its sink", pid);
    }

    #[tokio::test]
    async fn test_wait_without_clip() {
        let sink = CommandSink::from_config(&SpeechConfig::default());
        assert!(sink.wait().await.is_ok());
    }
}
