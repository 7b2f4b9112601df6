//! Persona prompt and fixed user-facing text
//!
//! This module holds the system prompt sent to the completion service and
//! every canned string the tutor shows: greetings, fallback replies and
//! notification wording. All of it is in Vietnamese, the learner's language.

pub mod tutor_prompt;

pub use tutor_prompt::{generate_tutor_prompt, PERSONA_NAME, PERSONA_ROLE};

/// Reply used when the completion service cannot be reached or fails
pub const NETWORK_FALLBACK_REPLY: &str =
    "Xin lỗi, hiện tại không thể kết nối đến server. Vui lòng kiểm tra kết nối mạng và thử lại!";

/// Reply used when the service answers but carries no completion text
pub const EMPTY_REPLY_FALLBACK: &str = "Xin lỗi, có lỗi xảy ra. Hãy thử lại!";

/// Greeting shown before the learner has given a name
pub const NAME_REQUEST_GREETING: &str = "Xin chào! Tôi là Thầy Quân. Bạn tên gì vậy? 😊";

/// Input prompt while waiting for the learner's name
pub const NAME_INPUT_PLACEHOLDER: &str = "Nhập tên của bạn...";

/// Input prompt once chatting
pub const CHAT_INPUT_PLACEHOLDER: &str = "Hỏi Thầy Quân về tiếng Trung...";

/// Notification title when a message could not be delivered
pub const SEND_FAILED_TITLE: &str = "Lỗi kết nối";

/// Notification body when a message could not be delivered
pub const SEND_FAILED_DESCRIPTION: &str = "Không thể gửi tin nhắn. Vui lòng thử lại!";

/// Notification title when no speech synthesizer exists
pub const SPEECH_UNSUPPORTED_TITLE: &str = "Không hỗ trợ phát âm";

/// Notification body when no speech synthesizer exists
pub const SPEECH_UNSUPPORTED_DESCRIPTION: &str =
    "Môi trường của bạn không hỗ trợ tính năng phát âm.";

/// Notification title when audio comes from the remote endpoint
pub const REMOTE_PRONUNCIATION_TITLE: &str = "Phát âm trực tuyến";

/// Notification body when audio comes from the remote endpoint
pub const REMOTE_PRONUNCIATION_DESCRIPTION: &str =
    "Máy chưa có giọng đọc tiếng Trung, đang dùng âm thanh trực tuyến.";

/// Builds the bot's welcome message for a learner
///
/// # Arguments
///
/// * `name` - The learner's display name, already trimmed
///
/// # Examples
///
/// ```
/// use hanyu_tutor::prompts::welcome_message;
///
/// let text = welcome_message("Linh");
/// assert!(text.starts_with("Chào Linh!"));
/// ```
pub fn welcome_message(name: &str) -> String {
    format!(
        "Chào {}! Tôi là {}, giáo viên tiếng Trung của bạn. Cùng nhau học tiếng Trung một cách thú vị nhé! 你好！欢迎来到我的中文课堂！",
        name, PERSONA_NAME
    )
}

/// Builds the header line shown once the learner is onboarded
///
/// # Examples
///
/// ```
/// use hanyu_tutor::prompts::header_greeting;
///
/// assert!(header_greeting("An").contains("An"));
/// ```
pub fn header_greeting(name: &str) -> String {
    format!("Chào {}, cùng học với {} nhé! 🇨🇳", name, PERSONA_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_chinese_runs;

    #[test]
    fn test_welcome_message_contains_name_and_persona() {
        let text = welcome_message("Linh");
        assert!(text.contains("Linh"));
        assert!(text.contains(PERSONA_NAME));
    }

    #[test]
    fn test_welcome_message_has_speakable_chinese() {
        let text = welcome_message("An");
        assert_eq!(
            extract_chinese_runs(&text),
            vec!["你好", "欢迎来到我的中文课堂"]
        );
    }

    #[test]
    fn test_header_greeting() {
        assert_eq!(
            header_greeting("An"),
            "Chào An, cùng học với Thầy Quân nhé! 🇨🇳"
        );
    }

    #[test]
    fn test_fallbacks_are_distinct() {
        assert_ne!(NETWORK_FALLBACK_REPLY, EMPTY_REPLY_FALLBACK);
    }
}
