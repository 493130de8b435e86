use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::profile::Profile;
use crate::domain::types::{MessageId, ProfileId, TypeConstraintError};

/// Upper bound for a single message body, in characters.
pub const MAX_MESSAGE_LEN: usize = 4000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: ProfileId,
    pub recipient_id: ProfileId,
    pub body: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

impl Message {
    pub fn try_new(
        id: i32,
        sender_id: i32,
        recipient_id: i32,
        body: String,
        is_read: bool,
        created_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: MessageId::new(id)?,
            sender_id: ProfileId::new(sender_id)?,
            recipient_id: ProfileId::new(recipient_id)?,
            body,
            is_read,
            created_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct NewMessage {
    pub sender_id: ProfileId,
    pub recipient_id: ProfileId,
    pub body: String,
}

impl NewMessage {
    /// Sanitizes the body and enforces the length bounds.
    pub fn try_new(
        sender_id: ProfileId,
        recipient_id: ProfileId,
        body: &str,
    ) -> Result<Self, TypeConstraintError> {
        if sender_id == recipient_id {
            return Err(TypeConstraintError::InvalidValue(
                "cannot send a message to yourself".to_string(),
            ));
        }

        let body = ammonia::clean(body.trim());
        let body = body.trim();
        if body.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if body.chars().count() > MAX_MESSAGE_LEN {
            return Err(TypeConstraintError::TooLong(MAX_MESSAGE_LEN));
        }

        Ok(Self {
            sender_id,
            recipient_id,
            body: body.to_string(),
        })
    }
}

/// Latest message exchanged with one counterpart.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ConversationSummary {
    pub counterpart: Profile,
    pub last_message: Message,
    pub unread: usize,
}
