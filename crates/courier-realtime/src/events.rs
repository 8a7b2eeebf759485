//! Wire events exchanged over the realtime channel.
//!
//! Envelopes are JSON objects tagged by `type`, keeping the protocol's
//! original event names (`message:send`, `message:receive`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use courier_entity::{MessageId, MessageWithParties, UserId};

/// Client-to-server events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Send a message to another user.
    #[serde(rename = "message:send")]
    MessageSend {
        /// Receiving user.
        receiver_id: UserId,
        /// Message body.
        content: String,
    },
    /// Fetch the full history with another user.
    #[serde(rename = "chat:history")]
    ChatHistory {
        /// The other party.
        other_user_id: UserId,
    },
    /// Mark a received message as read.
    #[serde(rename = "message:read")]
    MessageRead {
        /// The message to mark.
        message_id: MessageId,
    },
    /// Ask for the currently online users.
    #[serde(rename = "users:online")]
    OnlineUsers,
}

/// Server-to-client events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// A message addressed to this connection's user.
    #[serde(rename = "message:receive")]
    MessageReceive {
        /// The persisted message.
        message: MessageWithParties,
    },
    /// Echo of a message this connection's user sent.
    #[serde(rename = "message:sent")]
    MessageSent {
        /// The persisted message.
        message: MessageWithParties,
    },
    /// Another user came online.
    #[serde(rename = "user:online")]
    UserOnline {
        /// The user in question.
        user_id: UserId,
        /// Their display name.
        username: String,
        /// Always true for this event.
        online: bool,
    },
    /// Another user went offline.
    #[serde(rename = "user:offline")]
    UserOffline {
        /// The user in question.
        user_id: UserId,
        /// Their display name.
        username: String,
        /// Always false for this event.
        online: bool,
    },
    /// Answer to a `chat:history` request.
    #[serde(rename = "chat:history:response")]
    ChatHistoryResponse {
        /// Messages, oldest first.
        messages: Vec<MessageWithParties>,
    },
    /// Answer to a `message:read` request.
    #[serde(rename = "message:read:success")]
    MessageReadSuccess {
        /// The marked message.
        message_id: MessageId,
    },
    /// Answer to a `users:online` request.
    #[serde(rename = "users:online:response")]
    OnlineUsersResponse {
        /// Currently online users.
        users: Vec<UserPresence>,
    },
    /// An operation on this connection failed. The connection stays open.
    #[serde(rename = "error")]
    Error {
        /// Human-readable description.
        message: String,
    },
}

impl ServerEvent {
    /// Builds a `user:online` broadcast payload.
    pub fn user_online(user_id: UserId, username: String) -> Self {
        Self::UserOnline {
            user_id,
            username,
            online: true,
        }
    }

    /// Builds a `user:offline` broadcast payload.
    pub fn user_offline(user_id: UserId, username: String) -> Self {
        Self::UserOffline {
            user_id,
            username,
            online: false,
        }
    }

    /// Builds an `error` event from any application error.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Presence entry in a `users:online:response` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPresence {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Online at snapshot time.
    pub online: bool,
    /// Last presence transition.
    pub last_seen: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_send_event_parses() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"type":"message:send","receiver_id":2,"content":"hi"}"#)
                .unwrap();
        match event {
            ClientEvent::MessageSend {
                receiver_id,
                content,
            } => {
                assert_eq!(receiver_id, 2);
                assert_eq!(content, "hi");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_bare_online_users_event_parses() {
        let event: ClientEvent = serde_json::from_str(r#"{"type":"users:online"}"#).unwrap();
        assert!(matches!(event, ClientEvent::OnlineUsers));
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        let result = serde_json::from_str::<ClientEvent>(r#"{"type":"message:edit","id":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_presence_events_carry_online_flag() {
        let online = serde_json::to_string(&ServerEvent::user_online(1, "alice".into())).unwrap();
        assert!(online.contains(r#""type":"user:online""#));
        assert!(online.contains(r#""online":true"#));

        let offline = serde_json::to_string(&ServerEvent::user_offline(1, "alice".into())).unwrap();
        assert!(offline.contains(r#""type":"user:offline""#));
        assert!(offline.contains(r#""online":false"#));
    }
}
