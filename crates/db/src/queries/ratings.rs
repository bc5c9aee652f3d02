// crates/db/src/queries/ratings.rs
//! The rating ledger: one row per (job, provider) pair.

use sqlx::Row;

use taskmarket_core::Rating;

use crate::{Database, DbResult};

fn rating_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Rating, sqlx::Error> {
    Ok(Rating {
        id: row.try_get("id")?,
        job_id: row.try_get("job_id")?,
        provider_id: row.try_get("provider_id")?,
        score: row.try_get("score")?,
        comment: row.try_get("comment")?,
        created_at: row.try_get("created_at")?,
    })
}

impl Database {
    /// Insert a rating. The UNIQUE(job_id, provider_id) constraint makes a
    /// double rating fail with a unique violation.
    pub async fn insert_rating(&self, rating: &Rating) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO ratings (id, job_id, provider_id, score, comment, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&rating.id)
        .bind(&rating.job_id)
        .bind(&rating.provider_id)
        .bind(rating.score)
        .bind(&rating.comment)
        .bind(rating.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_rating(
        &self,
        job_id: &str,
        provider_id: &str,
    ) -> DbResult<Option<Rating>> {
        let row = sqlx::query("SELECT * FROM ratings WHERE job_id = ? AND provider_id = ?")
            .bind(job_id)
            .bind(provider_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref()
            .map(rating_from_row)
            .transpose()
            .map_err(Into::into)
    }

    pub async fn list_ratings_for_provider(&self, provider_id: &str) -> DbResult<Vec<Rating>> {
        let rows = sqlx::query(
            "SELECT * FROM ratings WHERE provider_id = ? ORDER BY created_at DESC",
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(rating_from_row)
            .collect::<Result<_, sqlx::Error>>()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(id: &str, job: &str, provider: &str, score: i64, at: i64) -> Rating {
        Rating {
            id: id.into(),
            job_id: job.into(),
            provider_id: provider.into(),
            score,
            comment: Some("on time, tidy work".into()),
            created_at: at,
        }
    }

    #[tokio::test]
    async fn insert_find_and_list() {
        let db = Database::new_in_memory().await.unwrap();
        db.insert_rating(&rating("r1", "j1", "p1", 5, 100)).await.unwrap();
        db.insert_rating(&rating("r2", "j2", "p1", 3, 200)).await.unwrap();
        db.insert_rating(&rating("r3", "j3", "p2", 4, 300)).await.unwrap();

        let found = db.find_rating("j1", "p1").await.unwrap().unwrap();
        assert_eq!(found.score, 5);
        assert!(db.find_rating("j1", "p2").await.unwrap().is_none());

        // Newest first.
        let listed = db.list_ratings_for_provider("p1").await.unwrap();
        assert_eq!(
            listed.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["r2", "r1"]
        );
    }

    #[tokio::test]
    async fn double_rating_hits_the_unique_constraint() {
        let db = Database::new_in_memory().await.unwrap();
        db.insert_rating(&rating("r1", "j1", "p1", 5, 100)).await.unwrap();
        let err = db
            .insert_rating(&rating("r2", "j1", "p1", 1, 200))
            .await
            .expect_err("second rating for the same pair should fail");
        assert!(err.is_unique_violation());
    }
}
