use teloxide::prelude::*;

#[tracing::instrument]
pub fn private_message_only(update: Update) -> bool {
    update.chat().map_or(true, |chat| chat.is_private())
}
