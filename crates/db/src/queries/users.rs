// crates/db/src/queries/users.rs
//! User records and the provider reputation lookup.

use sqlx::Row;

use taskmarket_core::User;

use super::{parse_role, role_str};
use crate::{Database, DbResult};

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, sqlx::Error> {
    let role: String = row.try_get("role")?;
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        role: parse_role(&role)?,
        rating: row.try_get("rating")?,
        created_at: row.try_get("created_at")?,
    })
}

impl Database {
    pub async fn insert_user(&self, user: &User) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, rating, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(role_str(user.role))
        .bind(user.rating)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_user(&self, id: &str) -> DbResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose().map_err(Into::into)
    }

    /// The reputation lookup: a provider's denormalized average rating,
    /// `None` until the provider is first rated.
    pub async fn get_provider_rating(&self, provider_id: &str) -> DbResult<Option<f64>> {
        let row: Option<(Option<f64>,)> =
            sqlx::query_as("SELECT rating FROM users WHERE id = ?")
                .bind(provider_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.and_then(|(rating,)| rating))
    }

    /// Refresh a provider's denormalized rating to the current average of
    /// its rating ledger. Called after every new rating.
    pub async fn refresh_provider_rating(&self, provider_id: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET rating = (SELECT AVG(score) FROM ratings WHERE provider_id = ?)
            WHERE id = ?
            "#,
        )
        .bind(provider_id)
        .bind(provider_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmarket_core::{Rating, Role};

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.into(),
            name: "Grace".into(),
            email: email.into(),
            role: Role::Provider,
            rating: None,
            created_at: 1_700_000_000_000,
        }
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let db = Database::new_in_memory().await.unwrap();
        let u = user("u1", "grace@example.com");
        db.insert_user(&u).await.unwrap();
        assert_eq!(db.get_user("u1").await.unwrap(), Some(u));
        assert!(db.get_user("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let db = Database::new_in_memory().await.unwrap();
        db.insert_user(&user("u1", "same@example.com")).await.unwrap();
        let err = db
            .insert_user(&user("u2", "same@example.com"))
            .await
            .expect_err("duplicate email should fail");
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn rating_lookup_and_refresh() {
        let db = Database::new_in_memory().await.unwrap();
        db.insert_user(&user("p1", "p1@example.com")).await.unwrap();

        // Unrated provider and unknown provider both resolve to None.
        assert_eq!(db.get_provider_rating("p1").await.unwrap(), None);
        assert_eq!(db.get_provider_rating("ghost").await.unwrap(), None);

        for (job, score) in [("j1", 5), ("j2", 4)] {
            db.insert_rating(&Rating {
                id: format!("r-{job}"),
                job_id: job.into(),
                provider_id: "p1".into(),
                score,
                comment: None,
                created_at: 0,
            })
            .await
            .unwrap();
        }
        db.refresh_provider_rating("p1").await.unwrap();

        assert_eq!(db.get_provider_rating("p1").await.unwrap(), Some(4.5));
    }
}
