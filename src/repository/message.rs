//! Repository implementation for direct messages.
//!
//! Reading a conversation never changes it; marking messages as read is a
//! separate write invoked explicitly by the caller.

use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::message::{ConversationSummary, Message, NewMessage};
use crate::domain::profile::Profile;
use crate::domain::types::ProfileId;
use crate::models::message::{Message as DbMessage, NewMessage as DbNewMessage};
use crate::models::profile::Profile as DbProfile;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ConversationQuery, DieselRepository, MessageReader, MessageWriter};

impl MessageReader for DieselRepository {
    fn list_conversation(
        &self,
        query: ConversationQuery,
    ) -> RepositoryResult<(usize, Vec<Message>)> {
        use crate::schema::messages;

        let mut conn = self.conn()?;
        let me = query.profile_id.get();
        let other = query.counterpart_id.get();

        let query_builder = || {
            messages::table
                .filter(
                    messages::sender_id
                        .eq(me)
                        .and(messages::recipient_id.eq(other))
                        .or(messages::sender_id
                            .eq(other)
                            .and(messages::recipient_id.eq(me))),
                )
                .into_boxed::<diesel::sqlite::Sqlite>()
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((messages::created_at.desc(), messages::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.sql_offset())
                .limit(pagination.sql_limit());
        }

        let messages = items
            .load::<DbMessage>(&mut conn)?
            .into_iter()
            .map(|m| Message::try_from(m).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, messages))
    }

    fn list_conversations(
        &self,
        profile_id: ProfileId,
    ) -> RepositoryResult<Vec<ConversationSummary>> {
        use crate::schema::{messages, profiles};

        let mut conn = self.conn()?;
        let me = profile_id.get();

        let db_messages = messages::table
            .filter(messages::sender_id.eq(me).or(messages::recipient_id.eq(me)))
            .order((messages::created_at.desc(), messages::id.desc()))
            .load::<DbMessage>(&mut conn)?;

        // Newest first, so the first message seen per counterpart is the latest.
        let mut order: Vec<i32> = Vec::new();
        let mut latest: HashMap<i32, DbMessage> = HashMap::new();
        let mut unread: HashMap<i32, usize> = HashMap::new();
        for message in db_messages {
            let counterpart = if message.sender_id == me {
                message.recipient_id
            } else {
                message.sender_id
            };
            if message.recipient_id == me && !message.is_read {
                *unread.entry(counterpart).or_default() += 1;
            }
            if !latest.contains_key(&counterpart) {
                order.push(counterpart);
                latest.insert(counterpart, message);
            }
        }

        let counterparts = profiles::table
            .filter(profiles::id.eq_any(&order))
            .load::<DbProfile>(&mut conn)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect::<HashMap<_, _>>();

        let mut summaries = Vec::with_capacity(order.len());
        for counterpart_id in order {
            let (Some(db_profile), Some(db_message)) = (
                counterparts.get(&counterpart_id),
                latest.remove(&counterpart_id),
            ) else {
                continue;
            };
            summaries.push(ConversationSummary {
                counterpart: Profile::try_from(db_profile.clone())?,
                last_message: Message::try_from(db_message)?,
                unread: unread.get(&counterpart_id).copied().unwrap_or(0),
            });
        }

        Ok(summaries)
    }

    fn count_unread_messages(&self, profile_id: ProfileId) -> RepositoryResult<usize> {
        use crate::schema::messages;

        let mut conn = self.conn()?;
        let total = messages::table
            .filter(messages::recipient_id.eq(profile_id.get()))
            .filter(messages::is_read.eq(false))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(total as usize)
    }
}

impl MessageWriter for DieselRepository {
    fn create_message(&self, new_message: &NewMessage) -> RepositoryResult<Message> {
        use crate::schema::messages;

        let mut conn = self.conn()?;
        let db_new_message: DbNewMessage = new_message.into();

        let db_message = diesel::insert_into(messages::table)
            .values(&db_new_message)
            .get_result::<DbMessage>(&mut conn)?;

        Ok(Message::try_from(db_message)?)
    }

    fn mark_conversation_read(
        &self,
        recipient_id: ProfileId,
        sender_id: ProfileId,
    ) -> RepositoryResult<usize> {
        use crate::schema::messages;

        let mut conn = self.conn()?;
        let updated = diesel::update(
            messages::table
                .filter(messages::recipient_id.eq(recipient_id.get()))
                .filter(messages::sender_id.eq(sender_id.get()))
                .filter(messages::is_read.eq(false)),
        )
        .set(messages::is_read.eq(true))
        .execute(&mut conn)?;

        Ok(updated)
    }
}
