//! Special commands parser for interactive lessons
//!
//! Special commands let the learner:
//! - Replay a Chinese fragment from the transcript
//! - Pronounce arbitrary text
//! - View session status
//! - Display help information
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive. Everything else
//! is sent to the tutor (or taken as the learner's name).

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during a lesson
///
/// These never reach the tutor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Display help information
    Help,

    /// Display name, phase and transcript size
    ShowStatus,

    /// Pronounce the numbered Chinese fragment (1-based, as printed)
    Speak(usize),

    /// Pronounce the given text
    Say(String),

    /// Exit the session
    Exit,

    /// Not a special command
    None,
}

/// Parse user input into a special command
///
/// Supported commands:
/// - `/speak <n>` or `/s <n>` - Pronounce fragment number `n`
/// - `/say <text>` - Pronounce arbitrary text
/// - `/status` - Show session status
/// - `/help` or `/?` - Show help information
/// - `/exit`, `/quit`, `exit` or `quit` - Exit the session
///
/// # Examples
///
/// ```
/// use hanyu_tutor::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/speak 2").unwrap(), SpecialCommand::Speak(2));
/// assert_eq!(
///     parse_special_command("/say 谢谢").unwrap(),
///     SpecialCommand::Say("谢谢".to_string())
/// );
/// assert_eq!(parse_special_command("你好吗").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let (head, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };

    match head.to_lowercase().as_str() {
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/status" => Ok(SpecialCommand::ShowStatus),

        "/speak" | "/s" => {
            if arg.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "/speak".to_string(),
                    usage: "/speak <number>".to_string(),
                });
            }
            match arg.parse::<usize>() {
                Ok(n) if n > 0 => Ok(SpecialCommand::Speak(n)),
                _ => Err(CommandError::UnsupportedArgument {
                    command: "/speak".to_string(),
                    arg: arg.to_string(),
                }),
            }
        }

        "/say" => {
            if arg.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "/say".to_string(),
                    usage: "/say <text>".to_string(),
                })
            } else {
                Ok(SpecialCommand::Say(arg.to_string()))
            }
        }

        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Display help information for special commands
pub fn print_help() {
    println!(
        r#"
Lệnh đặc biệt / Special Commands
================================

PHÁT ÂM (PRONUNCIATION):
  /speak <n>      - Play Chinese fragment number n (shown as 🔊[n])
  /s <n>          - Shorthand for /speak
  /say <text>     - Pronounce any text

SESSION:
  /status         - Show your name, phase and message count
  /help           - Show this help message
  /?              - Same as /help
  exit, /exit     - End the lesson
  quit, /quit     - Same as exit

NOTES:
  - Commands are case-insensitive
  - The first line you type is your name
  - After that, everything not starting with / goes to Thầy Quân
"#
    );
}
