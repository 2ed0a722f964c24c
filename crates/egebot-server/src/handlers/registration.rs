use std::sync::Arc;

use anyhow::Context;
use teloxide::prelude::*;
use teloxide::types::ReplyMarkup;

use crate::handlers::{message_text, BotDialog, State};
use crate::keyboards;
use crate::services::user;

#[tracing::instrument]
pub async fn start(bot: Bot, message: Message) -> anyhow::Result<()> {
    bot.send_message(
        message.chat.id,
        "Привет! Ты можешь зарегистрироваться, чтобы узнать свои баллы ЕГЭ.",
    )
    .reply_markup(ReplyMarkup::Keyboard(keyboards::main_kb()))
    .await?;

    Ok(())
}

#[tracing::instrument(skip(dialog))]
pub async fn begin_registration(bot: Bot, dialog: BotDialog, message: Message) -> anyhow::Result<()> {
    bot.send_message(message.chat.id, "Введите ваше имя:").await?;
    dialog.update(State::AwaitingName).await?;

    Ok(())
}

#[tracing::instrument(skip(dialog))]
pub async fn capture_name(bot: Bot, dialog: BotDialog, message: Message) -> anyhow::Result<()> {
    let first_name = message_text(&message);

    bot.send_message(message.chat.id, "Введите вашу фамилию:").await?;
    dialog.update(State::AwaitingSurname { first_name }).await?;

    Ok(())
}

#[tracing::instrument(skip(dialog))]
pub async fn capture_surname(
    bot: Bot,
    dialog: BotDialog,
    message: Message,
    first_name: String,
    user_service: Arc<user::Service>,
) -> anyhow::Result<()> {
    let last_name = message_text(&message);
    let telegram_id = message
        .from()
        .map(|user| user.id.0 as i64)
        .context("message has no sender")?;

    let user = match user_service
        .register(telegram_id, first_name, Some(last_name.clone()))
        .await
    {
        Ok(user) => user,
        Err(e) => {
            bot.send_message(message.chat.id, e.to_string()).await?;
            tracing::error!("Failed to register user: {}", e);
            return Err(e.into());
        }
    };

    bot.send_message(
        message.chat.id,
        format!("Вы успешно зарегистрированы, {} {}!", user.first_name, last_name),
    )
    .await?;

    // Registration flows straight into score entry.
    bot.send_message(
        message.chat.id,
        "Теперь вы можете ввести свои баллы ЕГЭ. Выберите предмет:",
    )
    .reply_markup(ReplyMarkup::InlineKeyboard(keyboards::subjects_kb()))
    .await?;
    dialog.update(State::AwaitingSubject).await?;

    Ok(())
}

#[tracing::instrument]
pub async fn login(bot: Bot, message: Message, user_service: Arc<user::Service>) -> anyhow::Result<()> {
    let telegram_id = message
        .from()
        .map(|user| user.id.0 as i64)
        .context("message has no sender")?;

    match user_service.find_by_telegram_id(telegram_id).await? {
        Some(user) => {
            log::info!("User {} logged in", user.telegram_id);
            bot.send_message(
                message.chat.id,
                "Привет! Ты можешь посмотреть или записать свои баллы ЕГЭ.",
            )
            .reply_markup(ReplyMarkup::Keyboard(keyboards::account_kb()))
            .await?;
        }
        None => {
            bot.send_message(
                message.chat.id,
                "Вы не зарегистрированы. Пожалуйста, зарегистрируйтесь для начала.",
            )
            .reply_markup(ReplyMarkup::Keyboard(keyboards::main_kb()))
            .await?;
        }
    }

    Ok(())
}

#[tracing::instrument(skip(dialog))]
pub async fn cancel(bot: Bot, dialog: BotDialog, message: Message) -> anyhow::Result<()> {
    dialog.reset().await?;
    bot.send_message(
        message.chat.id,
        "Ввод баллов отменен. Вы можете начать снова.",
    )
    .reply_markup(ReplyMarkup::Keyboard(keyboards::main_kb()))
    .await?;

    Ok(())
}
