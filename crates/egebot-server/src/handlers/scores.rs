use std::sync::Arc;

use anyhow::Context;
use teloxide::prelude::*;
use teloxide::types::ReplyMarkup;

use crate::handlers::{message_text, BotDialog, State};
use crate::keyboards;
use crate::services::{score, user};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScoreInputError {
    #[error("score is not a valid integer")]
    Format,
    #[error("score {0} is outside the 0-100 range")]
    OutOfRange(i32),
}

pub fn parse_score(input: &str) -> Result<i32, ScoreInputError> {
    let score = input.trim().parse::<i32>().map_err(|_| ScoreInputError::Format)?;
    if !(0..=100).contains(&score) {
        return Err(ScoreInputError::OutOfRange(score));
    }

    Ok(score)
}

#[tracing::instrument(skip(dialog))]
pub async fn record_scores(bot: Bot, dialog: BotDialog, message: Message) -> anyhow::Result<()> {
    bot.send_message(message.chat.id, "Пожалуйста, введите свои баллы.")
        .reply_markup(ReplyMarkup::InlineKeyboard(keyboards::subjects_kb()))
        .await?;
    dialog.update(State::AwaitingSubject).await?;

    Ok(())
}

#[tracing::instrument(skip(dialog))]
pub async fn enter_scores(bot: Bot, dialog: BotDialog, message: Message) -> anyhow::Result<()> {
    bot.send_message(message.chat.id, "Выберите предмет для ввода баллов:")
        .reply_markup(ReplyMarkup::InlineKeyboard(keyboards::subjects_kb()))
        .await?;
    dialog.update(State::AwaitingSubject).await?;

    Ok(())
}

/// Text-based subject selection while `AwaitingSubject`; the inline-keyboard
/// path is `select_subject`. Subject is stored as-is, not checked against the
/// menu list.
#[tracing::instrument(skip(dialog))]
pub async fn choose_subject(bot: Bot, dialog: BotDialog, message: Message) -> anyhow::Result<()> {
    let subject = message_text(&message);

    bot.send_message(message.chat.id, "Введите баллы за этот предмет:")
        .reply_markup(ReplyMarkup::Keyboard(keyboards::cancel_kb()))
        .await?;
    dialog.update(State::AwaitingScore { subject }).await?;

    Ok(())
}

#[tracing::instrument(skip(dialog))]
pub async fn select_subject(bot: Bot, dialog: BotDialog, query: CallbackQuery) -> anyhow::Result<()> {
    let data = query.data.clone().unwrap_or_default();
    let subject = data
        .strip_prefix(keyboards::SUBJECT_CALLBACK_PREFIX)
        .unwrap_or(&data)
        .to_owned();

    if let Some(message) = &query.message {
        bot.send_message(
            message.chat.id,
            format!("Вы выбрали предмет: {}. Введите баллы (0-100):", subject),
        )
        .await?;
    }
    dialog.update(State::AwaitingScore { subject }).await?;

    bot.answer_callback_query(query.id).await?;

    Ok(())
}

#[tracing::instrument(skip(dialog))]
pub async fn capture_score(
    bot: Bot,
    dialog: BotDialog,
    message: Message,
    subject: String,
    user_service: Arc<user::Service>,
    score_service: Arc<score::Service>,
) -> anyhow::Result<()> {
    let score = match parse_score(message.text().unwrap_or_default()) {
        Ok(score) => score,
        Err(ScoreInputError::OutOfRange(_)) => {
            // State stays `AwaitingScore`, the user may retry.
            bot.send_message(message.chat.id, "Баллы должны быть в пределах от 0 до 100.")
                .await?;
            return Ok(());
        }
        Err(ScoreInputError::Format) => {
            bot.send_message(message.chat.id, "Ошибка. Пожалуйста, введите валидные баллы.")
                .await?;
            return Ok(());
        }
    };

    let telegram_id = message
        .from()
        .map(|user| user.id.0 as i64)
        .context("message has no sender")?;

    // The flow assumes login ran first; an unregistered sender here is an
    // unrecovered error that reaches the dispatcher's error handler.
    let user = user_service
        .find_by_telegram_id(telegram_id)
        .await?
        .with_context(|| format!("no registered user for telegram id {}", telegram_id))?;

    let entry = score_service.record_score(user.id, &subject, score).await?;

    bot.send_message(
        message.chat.id,
        format!("Ваши баллы по предмету {}: {} успешно сохранены.", entry.subject, entry.score),
    )
    .reply_markup(ReplyMarkup::Keyboard(keyboards::account_kb()))
    .await?;
    dialog.reset().await?;

    Ok(())
}

#[tracing::instrument(skip(dialog))]
pub async fn view_scores(
    bot: Bot,
    dialog: BotDialog,
    message: Message,
    user_service: Arc<user::Service>,
    score_service: Arc<score::Service>,
) -> anyhow::Result<()> {
    let telegram_id = message
        .from()
        .map(|user| user.id.0 as i64)
        .context("message has no sender")?;

    let user = user_service
        .find_by_telegram_id(telegram_id)
        .await?
        .with_context(|| format!("no registered user for telegram id {}", telegram_id))?;

    let scores = score_service.list_scores(user.id).await?;
    if scores.is_empty() {
        bot.send_message(message.chat.id, "У вас нет результатов ЕГЭ. Пожалуйста, введите свои баллы.")
            .reply_markup(ReplyMarkup::InlineKeyboard(keyboards::subjects_kb()))
            .await?;
        dialog.update(State::AwaitingSubject).await?;
        return Ok(());
    }

    let content = scores.iter().fold("Ваши результаты ЕГЭ:\n".to_string(), |acc, entry| {
        format!("{}{}: {} баллов\n", acc, entry.subject, entry.score)
    });

    bot.send_message(message.chat.id, content)
        .reply_markup(ReplyMarkup::Keyboard(keyboards::account_kb()))
        .await?;

    Ok(())
}
