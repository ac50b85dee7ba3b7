//! Slash-command parsing.
//!
//! Anything not starting with `/` is a chat message for the mounted
//! conversation.

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the create-chat dialog.
    NewChat,
    /// Toggle the participant details panel.
    Details,
    /// Switch to the next conversation in the sidebar.
    Next,
    /// Quit the application.
    Quit,
    /// Send a chat message.
    Message {
        /// Message body.
        body: String,
    },
    /// Unrecognized slash command.
    Unknown {
        /// The raw input line.
        input: String,
    },
}

/// Parse an input line into a command.
pub fn parse(text: &str) -> Command {
    let Some(rest) = text.strip_prefix('/') else {
        return Command::Message { body: text.to_owned() };
    };

    match rest.trim() {
        "new" => Command::NewChat,
        "details" => Command::Details,
        "next" => Command::Next,
        "quit" | "q" => Command::Quit,
        _ => Command::Unknown { input: text.to_owned() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(parse("hello there"), Command::Message { body: "hello there".to_owned() });
    }

    #[test]
    fn slash_commands_parse() {
        assert_eq!(parse("/new"), Command::NewChat);
        assert_eq!(parse("/details"), Command::Details);
        assert_eq!(parse("/next"), Command::Next);
        assert_eq!(parse("/quit"), Command::Quit);
        assert_eq!(parse("/q"), Command::Quit);
    }

    #[test]
    fn unknown_slash_command_is_flagged() {
        assert_eq!(parse("/frobnicate"), Command::Unknown { input: "/frobnicate".to_owned() });
    }

    #[test]
    fn slash_alone_is_unknown() {
        assert_eq!(parse("/"), Command::Unknown { input: "/".to_owned() });
    }
}
