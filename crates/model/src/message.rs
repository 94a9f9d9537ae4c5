use serde::{Deserialize, Serialize};

/// Who sent a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing into the widget.
    User,
    /// The widget itself.
    Bot,
}

/// A complete message in the conversation.
///
/// Messages are created once per turn and never change afterwards. A bot
/// message only exists once its answer has been fully revealed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// The sender of the message.
    pub sender: Sender,
    /// Text content of the message.
    #[serde(rename = "message")]
    pub text: String,
}

impl Message {
    /// Creates a message sent by the user.
    #[inline]
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    /// Creates a message sent by the bot.
    #[inline]
    pub fn bot<S: Into<String>>(text: S) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let msg = Message::bot("Hi!");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"sender":"bot","message":"Hi!"}"#);

        let back: Message =
            serde_json::from_str(r#"{"sender":"user","message":"hello"}"#)
                .unwrap();
        assert_eq!(back, Message::user("hello"));
    }
}
