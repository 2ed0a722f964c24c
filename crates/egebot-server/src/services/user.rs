use std::sync::Arc;

use sea_orm::prelude::*;
use sea_orm::ActiveValue;

use egebot_entities::user;

#[derive(Clone, Debug)]
pub struct Service {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),
}

impl Service {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Inserts a new user row. There is no prior uniqueness check; a repeated
    /// registration for the same telegram id surfaces the unique-constraint
    /// violation as a database error.
    #[tracing::instrument]
    pub async fn register(
        &self,
        telegram_id: i64,
        first_name: String,
        last_name: Option<String>,
    ) -> Result<user::Model, Error> {
        let user = user::ActiveModel {
            telegram_id: ActiveValue::Set(telegram_id),
            first_name: ActiveValue::Set(first_name),
            last_name: ActiveValue::Set(last_name),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        tracing::debug!("User registered: {:?}", user);

        Ok(user)
    }

    #[tracing::instrument]
    pub async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<user::Model>, Error> {
        let user = user::Entity::find()
            .filter(user::Column::TelegramId.eq(telegram_id))
            .one(self.db.as_ref())
            .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn user_model(id: i64, telegram_id: i64) -> user::Model {
        user::Model {
            id,
            created_at: chrono::NaiveDateTime::default(),
            telegram_id,
            first_name: "Анна".to_owned(),
            last_name: Some("Иванова".to_owned()),
        }
    }

    #[tokio::test]
    async fn find_by_telegram_id_returns_none_for_unknown_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<user::Model>::new()])
            .into_connection();
        let service = Service::new(Arc::new(db));

        let user = service.find_by_telegram_id(42).await.unwrap();

        assert!(user.is_none());
    }

    #[tokio::test]
    async fn find_by_telegram_id_returns_registered_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user_model(1, 42)]])
            .into_connection();
        let service = Service::new(Arc::new(db));

        let user = service.find_by_telegram_id(42).await.unwrap().unwrap();

        assert_eq!(user.telegram_id, 42);
        assert_eq!(user.first_name, "Анна");
    }

    #[tokio::test]
    async fn register_inserts_new_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user_model(1, 42)]])
            .into_connection();
        let service = Service::new(Arc::new(db));

        let user = service
            .register(42, "Анна".to_owned(), Some("Иванова".to_owned()))
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.telegram_id, 42);
        assert_eq!(user.last_name.as_deref(), Some("Иванова"));
    }

    #[tokio::test]
    async fn services_share_a_single_connection() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(vec![vec![user_model(1, 42)], Vec::<user::Model>::new()])
                .into_connection(),
        );
        let first = Service::new(db.clone());
        let second = Service::new(db);

        assert!(first.find_by_telegram_id(42).await.unwrap().is_some());
        assert!(second.find_by_telegram_id(43).await.unwrap().is_none());
    }
}
