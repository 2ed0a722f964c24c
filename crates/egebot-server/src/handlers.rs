use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::dispatching::{dialogue, UpdateHandler};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::{filters, keyboards};

pub mod registration;
pub mod scores;

#[derive(Debug, Clone, BotCommands)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,
}

/// Per-chat conversation state. Transient flow data (the pending first name,
/// the selected subject) rides inside the variants. One state per chat:
/// entering a flow while another is active overwrites it.
#[derive(Debug, Clone, Default)]
pub enum State {
    #[default]
    Idle,
    AwaitingName,
    AwaitingSurname { first_name: String },
    AwaitingSubject,
    AwaitingScore { subject: String },
}

pub type BotDialog = Dialogue<State, InMemStorage<State>>;

/// Trimmed message text, or an empty string (with a warning) for messages
/// that carry no text at all.
pub(crate) fn message_text(message: &Message) -> String {
    match message.text() {
        Some(text) => text.trim().to_owned(),
        None => {
            log::warn!("Message in chat {} has no text", message.chat.id);
            String::new()
        }
    }
}

/// Routing priority: command match, then exact menu-label match, then the
/// active dialogue state, then subject-selection callbacks. Anything else
/// falls through to the dispatcher's default handler.
pub fn schema() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    let command_handler = dptree::entry()
        .filter_command::<Command>()
        .branch(case![Command::Start].endpoint(registration::start));

    let menu_handler = dptree::entry()
        .branch(
            dptree::filter(|message: Message| message.text() == Some(keyboards::REGISTER))
                .endpoint(registration::begin_registration),
        )
        .branch(
            dptree::filter(|message: Message| message.text() == Some(keyboards::LOGIN))
                .endpoint(registration::login),
        )
        .branch(
            dptree::filter(|message: Message| message.text() == Some(keyboards::VIEW_SCORES))
                .endpoint(scores::view_scores),
        )
        .branch(
            dptree::filter(|message: Message| message.text() == Some(keyboards::RECORD_SCORES))
                .endpoint(scores::record_scores),
        )
        .branch(
            dptree::filter(|message: Message| message.text() == Some(keyboards::ENTER_SCORES))
                .endpoint(scores::enter_scores),
        )
        .branch(
            dptree::filter(|message: Message| message.text() == Some(keyboards::CANCEL))
                .endpoint(registration::cancel),
        );

    let state_handler = dptree::entry()
        .branch(case![State::AwaitingName].endpoint(registration::capture_name))
        .branch(case![State::AwaitingSurname { first_name }].endpoint(registration::capture_surname))
        .branch(case![State::AwaitingSubject].endpoint(scores::choose_subject))
        .branch(case![State::AwaitingScore { subject }].endpoint(scores::capture_score));

    let message_handler = Update::filter_message()
        .filter(filters::private_message_only)
        .branch(command_handler)
        .branch(menu_handler)
        .branch(state_handler);

    let callback_handler = Update::filter_callback_query().branch(
        dptree::filter(|query: CallbackQuery| {
            query
                .data
                .as_deref()
                .map_or(false, |data| data.starts_with(keyboards::SUBJECT_CALLBACK_PREFIX))
        })
        .endpoint(scores::select_subject),
    );

    dialogue::enter::<Update, InMemStorage<State>, State, _>()
        .branch(message_handler)
        .branch(callback_handler)
}

#[cfg(test)]
mod tests {
    use teloxide::types::ChatId;

    use super::*;

    #[tokio::test]
    async fn dialogue_starts_without_state() {
        let storage = InMemStorage::<State>::new();
        let dialog = BotDialog::new(storage, ChatId(1));

        assert!(dialog.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn registration_flow_walks_through_name_and_surname() {
        let storage = InMemStorage::<State>::new();
        let dialog = BotDialog::new(storage, ChatId(1));

        dialog.update(State::AwaitingName).await.unwrap();
        assert!(matches!(dialog.get().await.unwrap(), Some(State::AwaitingName)));

        dialog
            .update(State::AwaitingSurname { first_name: "Анна".to_owned() })
            .await
            .unwrap();
        match dialog.get().await.unwrap() {
            Some(State::AwaitingSurname { first_name }) => assert_eq!(first_name, "Анна"),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test]
    async fn score_flow_keeps_selected_subject_until_reset() {
        let storage = InMemStorage::<State>::new();
        let dialog = BotDialog::new(storage, ChatId(1));

        dialog.update(State::AwaitingSubject).await.unwrap();
        dialog
            .update(State::AwaitingScore { subject: "Физика".to_owned() })
            .await
            .unwrap();
        match dialog.get().await.unwrap() {
            Some(State::AwaitingScore { subject }) => assert_eq!(subject, "Физика"),
            other => panic!("unexpected state: {:?}", other),
        }

        dialog.reset().await.unwrap();
        assert!(matches!(dialog.get().await.unwrap(), Some(State::Idle)));
    }

    #[tokio::test]
    async fn starting_a_new_flow_overwrites_the_active_one() {
        let storage = InMemStorage::<State>::new();
        let dialog = BotDialog::new(storage, ChatId(1));

        dialog.update(State::AwaitingName).await.unwrap();
        dialog.update(State::AwaitingSubject).await.unwrap();

        assert!(matches!(dialog.get().await.unwrap(), Some(State::AwaitingSubject)));
    }

    #[tokio::test]
    async fn dialogues_are_isolated_per_chat() {
        let storage = InMemStorage::<State>::new();
        let first = BotDialog::new(storage.clone(), ChatId(1));
        let second = BotDialog::new(storage, ChatId(2));

        first.update(State::AwaitingName).await.unwrap();

        assert!(second.get().await.unwrap().is_none());
    }
}
