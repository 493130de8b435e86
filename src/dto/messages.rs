use serde::Serialize;

use crate::domain::message::{ConversationSummary, Message};
use crate::domain::profile::Profile;

#[derive(Debug, Serialize)]
pub struct InboxPageData {
    pub conversations: Vec<ConversationSummary>,
    pub unread_total: usize,
}

/// One conversation, newest message first.
#[derive(Debug, Serialize)]
pub struct ConversationPageData {
    pub counterpart: Profile,
    pub messages: Vec<Message>,
    pub total: usize,
}
