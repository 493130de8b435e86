//! Direct messages between profiles.
//!
//! Reading a conversation never changes it; clearing the unread flags is a
//! separate call the route makes after rendering data is loaded.

use validator::Validate;

use crate::domain::message::{Message, NewMessage};
use crate::domain::profile::Profile;
use crate::domain::types::ProfileId;
use crate::dto::messages::{ConversationPageData, InboxPageData};
use crate::forms::messages::SendMessageForm;
use crate::repository::{ConversationQuery, MessageReader, MessageWriter, ProfileReader};
use crate::services::{ServiceError, ServiceResult};

pub const MESSAGES_PER_PAGE: usize = 50;

fn load_counterpart<R>(repo: &R, viewer: &Profile, counterpart_id: ProfileId) -> ServiceResult<Profile>
where
    R: ProfileReader + ?Sized,
{
    if viewer.id == counterpart_id {
        return Err(ServiceError::Form(
            "You cannot message yourself".to_string(),
        ));
    }

    repo.get_profile_by_id(counterpart_id)
        .map_err(|err| {
            log::error!("Failed to load profile {counterpart_id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)
}

pub fn load_inbox<R>(repo: &R, viewer: &Profile) -> ServiceResult<InboxPageData>
where
    R: MessageReader + ?Sized,
{
    let conversations = repo.list_conversations(viewer.id).map_err(|err| {
        log::error!("Failed to list conversations of {}: {err}", viewer.id);
        err
    })?;
    let unread_total = conversations.iter().map(|c| c.unread).sum();

    Ok(InboxPageData {
        conversations,
        unread_total,
    })
}

/// Loads one page of the conversation without touching the read flags.
pub fn load_conversation<R>(
    repo: &R,
    viewer: &Profile,
    counterpart_id: ProfileId,
    page: usize,
) -> ServiceResult<ConversationPageData>
where
    R: ProfileReader + MessageReader + ?Sized,
{
    let counterpart = load_counterpart(repo, viewer, counterpart_id)?;

    let query = ConversationQuery::new(viewer.id, counterpart_id).paginate(page, MESSAGES_PER_PAGE);
    let (total, messages) = repo.list_conversation(query).map_err(|err| {
        log::error!("Failed to load conversation {} <-> {counterpart_id}: {err}", viewer.id);
        err
    })?;

    Ok(ConversationPageData {
        counterpart,
        messages,
        total,
    })
}

/// Marks everything the counterpart sent to the viewer as read.
pub fn mark_conversation_read<R>(
    repo: &R,
    viewer: &Profile,
    counterpart_id: ProfileId,
) -> ServiceResult<usize>
where
    R: MessageWriter + ?Sized,
{
    repo.mark_conversation_read(viewer.id, counterpart_id)
        .map_err(|err| {
            log::error!("Failed to mark messages from {counterpart_id} as read: {err}");
            ServiceError::from(err)
        })
}

pub fn send_message<R>(
    repo: &R,
    viewer: &Profile,
    counterpart_id: ProfileId,
    form: SendMessageForm,
) -> ServiceResult<Message>
where
    R: ProfileReader + MessageWriter + ?Sized,
{
    if let Err(err) = form.validate() {
        log::error!("Failed to validate message form: {err}");
        return Err(ServiceError::Form("Message must be 1-4000 characters".to_string()));
    }

    let counterpart = load_counterpart(repo, viewer, counterpart_id)?;
    let new_message = NewMessage::try_new(viewer.id, counterpart.id, &form.body)?;

    repo.create_message(&new_message).map_err(|err| {
        log::error!("Failed to send message to {counterpart_id}: {err}");
        ServiceError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message::ConversationSummary;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{now, profile};

    fn message(id: i32, from: i32, to: i32) -> Message {
        Message::try_new(id, from, to, format!("hello {id}"), false, now()).unwrap()
    }

    #[test]
    fn inbox_sums_unread() {
        let mut repo = MockRepository::new();
        repo.expect_list_conversations().returning(|_| {
            Ok(vec![
                ConversationSummary {
                    counterpart: profile(2, "teacher"),
                    last_message: message(1, 2, 1),
                    unread: 2,
                },
                ConversationSummary {
                    counterpart: profile(3, "teacher"),
                    last_message: message(2, 3, 1),
                    unread: 1,
                },
            ])
        });

        let data = load_inbox(&repo, &profile(1, "student")).unwrap();
        assert_eq!(data.unread_total, 3);
    }

    #[test]
    fn loading_a_conversation_does_not_mark_it_read() {
        let mut repo = MockRepository::new();
        repo.expect_get_profile_by_id()
            .returning(|id| Ok(Some(profile(id.get(), "teacher"))));
        repo.expect_list_conversation()
            .withf(|query| query.profile_id.get() == 1 && query.counterpart_id.get() == 2)
            .returning(|_| Ok((1, vec![message(1, 2, 1)])));
        repo.expect_mark_conversation_read().times(0);

        let data = load_conversation(&repo, &profile(1, "student"), ProfileId::new(2).unwrap(), 1)
            .unwrap();
        assert_eq!(data.total, 1);
        assert_eq!(data.counterpart.id.get(), 2);
    }

    #[test]
    fn mark_read_targets_messages_from_counterpart() {
        let mut repo = MockRepository::new();
        repo.expect_mark_conversation_read()
            .withf(|recipient, sender| recipient.get() == 1 && sender.get() == 2)
            .times(1)
            .returning(|_, _| Ok(3));

        let updated =
            mark_conversation_read(&repo, &profile(1, "student"), ProfileId::new(2).unwrap())
                .unwrap();
        assert_eq!(updated, 3);
    }

    #[test]
    fn send_to_unknown_recipient_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_profile_by_id().returning(|_| Ok(None));
        repo.expect_create_message().times(0);

        let form = SendMessageForm {
            body: "Hi".to_string(),
        };
        let result = send_message(&repo, &profile(1, "student"), ProfileId::new(9).unwrap(), form);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn send_to_self_is_a_form_error() {
        let repo = MockRepository::new();
        let form = SendMessageForm {
            body: "Hi".to_string(),
        };
        let result = send_message(&repo, &profile(1, "student"), ProfileId::new(1).unwrap(), form);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn send_stores_sanitized_body() {
        let mut repo = MockRepository::new();
        repo.expect_get_profile_by_id()
            .returning(|id| Ok(Some(profile(id.get(), "teacher"))));
        repo.expect_create_message()
            .withf(|new_message| new_message.body == "Hi")
            .times(1)
            .returning(|_| Ok(message(5, 1, 2)));

        let form = SendMessageForm {
            body: " Hi<script>x</script> ".to_string(),
        };
        send_message(&repo, &profile(1, "student"), ProfileId::new(2).unwrap(), form).unwrap();
    }
}
