use std::sync::Arc;

use sea_orm::Database;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;

use crate::handlers::State;

mod filters;
mod handlers;
mod keyboards;
mod services;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let config = egebot_common::config::Config::new()?;

    // Initialize the tracer
    egebot_common::observability::tracing::init_tracer(
        env!("CARGO_PKG_NAME").to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
        &config,
    );

    let db = Arc::new(Database::connect(config.database_url()).await?);

    let bot = Bot::new(&config.bot_token);

    let user_service = Arc::new(services::user::Service::new(db.clone()));
    let score_service = Arc::new(services::score::Service::new(db.clone()));

    Dispatcher::builder(bot, handlers::schema())
        .dependencies(dptree::deps![
            InMemStorage::<State>::new(),
            user_service,
            score_service
        ])
        .default_handler(|update| async move {
            log::warn!("Unhandled update: {:?}", update);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    if let Ok(db) = Arc::try_unwrap(db) {
        db.close().await?;
    }

    Ok(())
}
