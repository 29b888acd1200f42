//! Texts the bot sends to users.

use crate::Error;

pub const START_TEXT: &str = "Hi! I'm an AI assistant bot. Send me any message and I'll respond using AI!\n\n\
Commands:\n\
/start - Show this message\n\
/help - Show help information";

pub const HELP_TEXT: &str = "I'm an AI assistant bot powered by advanced language models.\n\n\
Just send me any message and I'll respond intelligently!\n\n\
You can ask me questions, have conversations, or request help with various topics.";

/// The completion endpoint answered with a non-200 status.
pub const SERVICE_ERROR_TEXT: &str = "Sorry, I'm having trouble connecting to the AI service.";

/// The completion endpoint could not be reached at all.
pub const UNREACHABLE_TEXT: &str = "Sorry, I couldn't reach the AI service. Please try again later.";

pub const GENERIC_ERROR_TEXT: &str = "Sorry, something went wrong while processing your request.";

/// Telegram rejects messages longer than this many UTF-16 code units.
pub const MAX_MESSAGE_UTF16: usize = 4096;

/// User-facing text for a failed completion.
pub fn for_error(error: &Error) -> &'static str {
    match error {
        Error::Status { .. } => SERVICE_ERROR_TEXT,
        e if e.is_transport() => UNREACHABLE_TEXT,
        _ => GENERIC_ERROR_TEXT,
    }
}

/// Split `text` into pieces Telegram accepts, preferring line breaks as cut points.
/// Whitespace between pieces is dropped so no piece is blank.
pub fn split_message(text: &str, max_utf16: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        let mut units = 0;
        let mut cut = rest.len();
        let mut last_newline = None;

        for (idx, ch) in rest.char_indices() {
            units += ch.len_utf16();
            if units > max_utf16 {
                cut = idx;
                break;
            }
            if ch == '\n' {
                last_newline = Some(idx + 1);
            }
        }

        if cut < rest.len() {
            if let Some(newline) = last_newline {
                cut = newline;
            }
        }
        // A single character wider than the limit still has to go somewhere
        if cut == 0 {
            cut = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }

        let (part, tail) = rest.split_at(cut);
        parts.push(part);
        rest = tail.trim_start();
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_map_to_service_text() {
        assert_eq!(for_error(&Error::status(404, "not found")), SERVICE_ERROR_TEXT);
        assert_eq!(for_error(&Error::status(500, "")), SERVICE_ERROR_TEXT);
        assert_eq!(
            SERVICE_ERROR_TEXT,
            "Sorry, I'm having trouble connecting to the AI service."
        );
    }

    #[test]
    fn test_other_errors_map_to_generic_text() {
        assert_eq!(for_error(&Error::streaming("boom")), GENERIC_ERROR_TEXT);
        assert_eq!(for_error(&Error::provider("Telegram", "x")), GENERIC_ERROR_TEXT);
        assert_ne!(UNREACHABLE_TEXT, SERVICE_ERROR_TEXT);
    }

    #[test]
    fn test_short_message_is_not_split() {
        assert_eq!(split_message("Hello", MAX_MESSAGE_UTF16), vec!["Hello"]);
        assert!(split_message("", MAX_MESSAGE_UTF16).is_empty());
    }

    #[test]
    fn test_split_prefers_newlines() {
        let parts = split_message("aaaa\nbbbb\ncc", 7);
        assert_eq!(parts, vec!["aaaa\n", "bbbb\ncc"]);
    }

    #[test]
    fn test_split_without_newlines() {
        let parts = split_message("abcdefghij", 4);
        assert_eq!(parts, vec!["abcd", "efgh", "ij"]);
        assert_eq!(parts.concat(), "abcdefghij");
    }

    #[test]
    fn test_split_counts_utf16_units() {
        // Each emoji is two UTF-16 code units
        let parts = split_message("😀😀😀", 4);
        assert_eq!(parts, vec!["😀😀", "😀"]);
    }

    #[test]
    fn test_split_never_yields_blank_parts() {
        let text = format!("{}\n\n{}", "a".repeat(4095), "b".repeat(5000));
        let parts = split_message(&text, MAX_MESSAGE_UTF16);
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| !p.trim().is_empty()));
        assert_eq!(parts[0], format!("{}\n", "a".repeat(4095)));
        assert_eq!(parts[1], "b".repeat(4096));
        assert_eq!(parts[2], "b".repeat(904));
    }

    #[test]
    fn test_split_long_reply() {
        let text = "x".repeat(MAX_MESSAGE_UTF16 * 2 + 10);
        let parts = split_message(&text, MAX_MESSAGE_UTF16);
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.len() <= MAX_MESSAGE_UTF16));
        assert_eq!(parts.concat(), text);
    }
}
