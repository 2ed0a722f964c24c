use std::sync::Arc;

use sea_orm::prelude::*;
use sea_orm::{ActiveValue, IntoActiveModel};

use egebot_entities::exam_score;

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

    /// Stores a score for the (user, subject) pair. An already recorded subject
    /// is updated in place, so the pair never gets a second row.
    #[tracing::instrument]
    pub async fn record_score(
        &self,
        user_id: i64,
        subject: &str,
        score: i32,
    ) -> Result<exam_score::Model, Error> {
        let existing = exam_score::Entity::find()
            .filter(exam_score::Column::UserId.eq(user_id))
            .filter(exam_score::Column::Subject.eq(subject))
            .one(self.db.as_ref())
            .await?;

        let entry = match existing {
            Some(entry) => {
                let mut entry = entry.into_active_model();
                entry.score = ActiveValue::Set(score);
                entry.update(self.db.as_ref()).await?
            }
            None => {
                exam_score::ActiveModel {
                    user_id: ActiveValue::Set(user_id),
                    subject: ActiveValue::Set(subject.to_owned()),
                    score: ActiveValue::Set(score),
                    ..Default::default()
                }
                .insert(self.db.as_ref())
                .await?
            }
        };

        tracing::debug!("Score recorded: {:?}", entry);

        Ok(entry)
    }

    #[tracing::instrument]
    pub async fn list_scores(&self, user_id: i64) -> Result<Vec<exam_score::Model>, Error> {
        let scores = exam_score::Entity::find()
            .filter(exam_score::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await?;

        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn score_model(id: i64, user_id: i64, subject: &str, score: i32) -> exam_score::Model {
        exam_score::Model {
            id,
            created_at: chrono::NaiveDateTime::default(),
            user_id,
            subject: subject.to_owned(),
            score,
        }
    }

    #[tokio::test]
    async fn record_score_inserts_when_subject_is_new() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![
                vec![],
                vec![score_model(1, 7, "Физика", 90)],
            ])
            .into_connection();
        let service = Service::new(Arc::new(db));

        let entry = service.record_score(7, "Физика", 90).await.unwrap();

        assert_eq!(entry.user_id, 7);
        assert_eq!(entry.subject, "Физика");
        assert_eq!(entry.score, 90);
    }

    #[tokio::test]
    async fn record_score_updates_existing_row_in_place() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![
                vec![score_model(1, 7, "Математика Профиль", 80)],
                vec![score_model(1, 7, "Математика Профиль", 95)],
            ])
            .into_connection();
        let service = Service::new(Arc::new(db));

        let entry = service.record_score(7, "Математика Профиль", 95).await.unwrap();

        // Same row id: the resubmission replaced the score instead of adding a row.
        assert_eq!(entry.id, 1);
        assert_eq!(entry.score, 95);
    }

    #[tokio::test]
    async fn list_scores_returns_all_rows_for_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                score_model(1, 7, "Русский язык", 88),
                score_model(2, 7, "Химия", 73),
            ]])
            .into_connection();
        let service = Service::new(Arc::new(db));

        let scores = service.list_scores(7).await.unwrap();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].subject, "Русский язык");
        assert_eq!(scores[1].score, 73);
    }

    #[tokio::test]
    async fn list_scores_is_empty_for_fresh_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<exam_score::Model>::new()])
            .into_connection();
        let service = Service::new(Arc::new(db));

        let scores = service.list_scores(7).await.unwrap();

        assert!(scores.is_empty());
    }
}
