/*!
Command handlers for the CLI

This module provides the handlers invoked by the CLI entrypoint:

- `chat`    - Interactive lesson with the tutor
- `ask`     - One question, one printed reply
- `speak`   - Pronounce a piece of text
- `extract` - Print the Chinese runs of a piece of text
- `voices`  - List synthesizer voices

The handlers are small and only wire together the library components:
the completion client, the conversation session and the speech player.
*/

use crate::config::Config;
use crate::conversation::{ConversationState, Message};
use crate::error::Result;
use crate::extract::{contains_chinese, extract_chinese_runs};
use crate::notify::{Notification, Notifier, TerminalNotifier};
use crate::prompts::{PERSONA_NAME, PERSONA_ROLE};
use crate::speech::{SpeechOutcome, SpeechPlayer};
use colored::Colorize;
use std::sync::Arc;

// Special commands parser for the interactive lesson
pub mod special_commands;

/// Render one tutor message with numbered playback markers
///
/// Markers are numbered from `first_fragment`, so numbers stay unique across
/// the whole transcript.
///
/// # Examples
///
/// ```
/// use hanyu_tutor::commands::render_bot_message;
/// use hanyu_tutor::conversation::Message;
///
/// colored::control::set_override(false);
/// let text = render_bot_message(&Message::bot("你好！📝 ni hao"), 3);
/// assert!(text.contains("🔊[3] 你好"));
/// ```
pub fn render_bot_message(message: &Message, first_fragment: usize) -> String {
    let mut out = format!("{} {}", format!("{}:", PERSONA_NAME).cyan().bold(), message.content());

    let runs = message.chinese_runs();
    if !runs.is_empty() {
        let markers: Vec<String> = runs
            .iter()
            .enumerate()
            .map(|(i, run)| format!("🔊[{}] {}", first_fragment + i, run))
            .collect();
        out.push('\n');
        out.push_str(&format!("  {}", markers.join("  ").dimmed()));
    }
    out
}

/// All playable fragments in transcript order
///
/// Fragment `n` in the chat view is `fragments(state)[n - 1]`.
pub fn fragments(state: &ConversationState) -> Vec<&str> {
    state
        .speakable()
        .into_iter()
        .flat_map(|s| s.runs)
        .collect()
}

/// Tell the learner about a playback outcome they should know about
fn report_outcome(outcome: &SpeechOutcome, notifier: &dyn Notifier) {
    match outcome {
        SpeechOutcome::Played { voice } => tracing::debug!("Spoken with voice {}", voice),
        SpeechOutcome::FellBack { url } => {
            tracing::debug!("Remote pronunciation: {}", url);
            notifier.notify(&Notification::remote_pronunciation());
        }
        // the notifier has already told the learner
        SpeechOutcome::Unsupported => {}
    }
}

// Chat command handler
pub mod chat {
    //! Interactive lesson handler.
    //!
    //! Builds the completion client and speech player, then runs a
    //! readline loop that feeds input to a conversation [`Session`].

    use super::*;
    use crate::chat_phase::ChatPhase;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::conversation::Session;
    use crate::prompts::{header_greeting, NAME_REQUEST_GREETING};
    use crate::providers::create_client;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Tracks which transcript messages have been printed
    #[derive(Debug, Default)]
    pub struct TranscriptView {
        rendered: usize,
    }

    impl TranscriptView {
        /// Render messages appended since the last call
        ///
        /// Learner messages are not echoed, since readline already shows them.
        pub fn render_new(&mut self, state: &ConversationState) -> Vec<String> {
            let transcript = state.transcript();
            let mut next_fragment = 1;
            let mut lines = Vec::new();

            for (index, message) in transcript.iter().enumerate() {
                if !message.is_bot() {
                    continue;
                }
                if index >= self.rendered {
                    lines.push(render_bot_message(message, next_fragment));
                }
                next_fragment += message.chinese_runs().len();
            }

            self.rendered = transcript.len();
            lines
        }
    }

    /// Start an interactive lesson
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `name` - Learner name; skips the name question when given
    ///
    /// # Errors
    ///
    /// Returns error if the completion client cannot be created (for example
    /// a missing API key) or the terminal cannot be read
    ///
    /// # Examples
    ///
    /// ```
    /// use hanyu_tutor::commands::chat;
    /// use hanyu_tutor::config::Config;
    ///
    /// // In application code:
    /// // chat::run_chat(Config::default(), None).await?;
    /// ```
    pub async fn run_chat(config: Config, name: Option<String>) -> Result<()> {
        tracing::info!("Starting interactive lesson");

        let client = create_client(&config.provider)?;
        let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);
        let player = SpeechPlayer::from_config(&config.speech, Arc::clone(&notifier)).await?;
        let mut session = Session::new(client, Arc::clone(&notifier));
        let mut view = TranscriptView::default();

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(player.is_supported());

        if let Some(name) = name.as_deref() {
            session.submit(name);
        }
        if session.state().onboarding_complete() {
            print_header(session.state());
        } else {
            println!(
                "{} {}\n",
                format!("{}:", PERSONA_NAME).cyan().bold(),
                NAME_REQUEST_GREETING
            );
        }
        print_lines(view.render_new(session.state()));

        loop {
            let prompt = session.state().phase().format_colored_prompt();
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::ShowStatus) => {
                            print_status_display(session.state(), player.is_supported());
                            continue;
                        }
                        Ok(SpecialCommand::Speak(n)) => {
                            match fragments(session.state()).get(n - 1) {
                                Some(text) => {
                                    report_outcome(&player.speak(text).await, notifier.as_ref())
                                }
                                None => eprintln!("No fragment {} to play\n", n),
                            }
                            continue;
                        }
                        Ok(SpecialCommand::Say(text)) => {
                            report_outcome(&player.speak(&text).await, notifier.as_ref());
                            continue;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {}
                        Err(e) => {
                            eprintln!("{}\n", e);
                            continue;
                        }
                    }

                    rl.add_history_entry(trimmed)?;

                    let was_chatting = session.state().phase().is_chatting();
                    session.submit(trimmed);

                    if session.state().pending_request() {
                        println!(
                            "{}",
                            format!("{} đang trả lời...", PERSONA_NAME).dimmed().italic()
                        );
                        session.wait_for_reply().await;
                    }

                    if !was_chatting && session.state().phase().is_chatting() {
                        print_header(session.state());
                    }
                    print_lines(view.render_new(session.state()));
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_lines(lines: Vec<String>) {
        for line in lines {
            println!("{}\n", line);
        }
    }

    fn print_welcome_banner(speech_supported: bool) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║          Hanyu Tutor - Học tiếng Trung với Thầy Quân         ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("{} ({})", PERSONA_NAME.cyan().bold(), PERSONA_ROLE);
        if !speech_supported {
            println!("{}", "Phát âm: không khả dụng".yellow());
        }
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    fn print_header(state: &ConversationState) {
        if let Some(name) = state.display_name() {
            println!("{}\n", header_greeting(name).green().bold());
        }
    }

    /// Display session status for the `/status` command
    fn print_status_display(state: &ConversationState, speech_supported: bool) {
        println!("\n╔══════════════════════════════════════╗");
        println!("║          Session Status              ║");
        println!("╚══════════════════════════════════════╝\n");
        println!(
            "Learner:    {}",
            state.display_name().unwrap_or("(not set)")
        );
        println!("Phase:      {}", state.phase().colored_tag());
        println!("Messages:   {}", state.transcript().len());
        println!("Fragments:  {}", fragments(state).len());
        if let Some(last) = state.last_bot_message() {
            println!(
                "Last reply: {}",
                last.timestamp().with_timezone(&chrono::Local).format("%H:%M:%S")
            );
        }
        println!(
            "Speech:     {}",
            if speech_supported {
                "available".green()
            } else {
                "unavailable".yellow()
            }
        );
        if state.phase() == ChatPhase::AwaitingName {
            println!("\nType your name to begin.");
        }
        println!();
    }

}

// One-shot question handler
pub mod ask {
    //! Sends one question to the tutor and prints the reply.

    use super::*;
    use crate::providers::create_client;

    /// Ask a single question
    ///
    /// Failures are reported the same way as in the lesson: the fallback
    /// reply is printed. Blank input sends nothing.
    ///
    /// # Errors
    ///
    /// Returns error if the completion client cannot be created
    pub async fn run_ask(config: Config, text: String) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            tracing::warn!("Nothing to ask");
            return Ok(());
        }

        let client = create_client(&config.provider)?;
        let reply = client.complete(text).await;
        println!("{}", render_bot_message(&Message::bot(reply), 1));
        Ok(())
    }
}

// Pronunciation handler
pub mod speak {
    //! Pronounces text through the playback fallback chain.

    use super::*;

    /// Pronounce `text` and wait for playback to finish
    ///
    /// # Errors
    ///
    /// Returns error if the speech configuration is invalid
    pub async fn run_speak(config: Config, text: String) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            tracing::warn!("Nothing to pronounce");
            return Ok(());
        }
        if !contains_chinese(text) {
            tracing::warn!("No Chinese characters in input, pronouncing it as given");
        }

        let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);
        let player = SpeechPlayer::from_config(&config.speech, Arc::clone(&notifier)).await?;
        let outcome = player.speak(text).await;
        report_outcome(&outcome, notifier.as_ref());
        player.wait_idle().await;
        Ok(())
    }
}

// Extraction handler
pub mod extract {
    //! Prints the Chinese runs found in a piece of text.

    use super::*;

    /// Print each Chinese run on its own numbered line
    pub fn run_extract(text: &str) -> Result<()> {
        let runs = extract_chinese_runs(text);
        if runs.is_empty() {
            println!("{}", "No Chinese text found".dimmed());
        }
        for (i, run) in runs.iter().enumerate() {
            println!("{:>3}. {}", i + 1, run);
        }
        Ok(())
    }
}

// Voice listing handler
pub mod voices {
    //! Lists the voices of the configured synthesizer.

    use super::*;
    use crate::speech::{select_chinese_voice, EspeakSynthesizer, VoiceSynthesizer};

    /// List synthesizer voices, marking the one used for Chinese
    ///
    /// # Errors
    ///
    /// Returns error if the synthesizer exists but cannot list its voices
    pub async fn run_voices(config: Config) -> Result<()> {
        let Some(synthesizer) = EspeakSynthesizer::detect(&config.speech.engine).await else {
            TerminalNotifier.notify(&Notification::speech_unsupported());
            return Ok(());
        };

        let voices = synthesizer.voices().await?;
        let selected = select_chinese_voice(&voices, &config.speech.language);

        println!("{} voices from {}:\n", voices.len(), synthesizer.name());
        for voice in &voices {
            let marker = if Some(voice) == selected { "*" } else { " " };
            println!("{} {:<12} {}", marker.green().bold(), voice.language, voice.name);
        }

        match selected {
            Some(voice) => println!("\nChinese playback uses: {}", voice.name.green()),
            None => println!(
                "\n{}",
                "No Chinese voice installed; pronunciation will use remote audio".yellow()
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{CompletionResult, Event};
    use crate::test_utils::RecordingNotifier;

    #[test]
    fn test_render_bot_message_without_chinese() {
        colored::control::set_override(false);
        let text = render_bot_message(&Message::bot("Xin chào"), 1);
        assert_eq!(text, format!("{}: Xin chào", PERSONA_NAME));
    }

    #[test]
    fn test_render_bot_message_numbers_runs() {
        colored::control::set_override(false);
        let text = render_bot_message(&Message::bot("我爱你, 中国"), 5);
        assert!(text.contains("🔊[5] 我爱你"));
        assert!(text.contains("🔊[6] 中国"));
    }

    #[test]
    fn test_fragments_follow_transcript_order() {
        let mut state = ConversationState::new();
        state.set_name("An");
        state.apply(Event::SendMessage("hi".into()));
        state.apply(Event::CompletionResolved(CompletionResult::delivered("学习")));

        assert_eq!(
            fragments(&state),
            vec!["你好", "欢迎来到我的中文课堂", "学习"]
        );
    }

    #[test]
    fn test_report_outcome_notifies_only_on_fallback() {
        let notifier = RecordingNotifier::default();

        report_outcome(
            &SpeechOutcome::Played {
                voice: "Mandarin".into(),
            },
            &notifier,
        );
        report_outcome(&SpeechOutcome::Unsupported, &notifier);
        assert!(notifier.notifications().is_empty());

        report_outcome(
            &SpeechOutcome::FellBack {
                url: "http://tts.test/?q=x".into(),
            },
            &notifier,
        );
        assert_eq!(
            notifier.notifications(),
            vec![Notification::remote_pronunciation()]
        );
    }

    #[test]
    fn test_run_extract() {
        assert!(extract::run_extract("你好 world").is_ok());
        assert!(extract::run_extract("").is_ok());
    }
}
