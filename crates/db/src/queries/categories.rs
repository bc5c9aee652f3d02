// crates/db/src/queries/categories.rs

use sqlx::Row;

use taskmarket_core::Category;

use crate::{Database, DbResult};

impl Database {
    pub async fn insert_category(&self, category: &Category) -> DbResult<()> {
        sqlx::query("INSERT INTO categories (id, name) VALUES (?, ?)")
            .bind(&category.id)
            .bind(&category.name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|r| {
                Ok(Category {
                    id: r.try_get("id")?,
                    name: r.try_get("name")?,
                })
            })
            .collect::<Result<_, sqlx::Error>>()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_and_list_sorted_by_name() {
        let db = Database::new_in_memory().await.unwrap();
        for (id, name) in [("c1", "Plumbing"), ("c2", "Electrical"), ("c3", "Cleaning")] {
            db.insert_category(&Category {
                id: id.into(),
                name: name.into(),
            })
            .await
            .unwrap();
        }

        let listed = db.list_categories().await.unwrap();
        assert_eq!(
            listed.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["Cleaning", "Electrical", "Plumbing"]
        );
    }

    #[tokio::test]
    async fn duplicate_name_is_a_unique_violation() {
        let db = Database::new_in_memory().await.unwrap();
        db.insert_category(&Category {
            id: "c1".into(),
            name: "Moving".into(),
        })
        .await
        .unwrap();
        let err = db
            .insert_category(&Category {
                id: "c2".into(),
                name: "Moving".into(),
            })
            .await
            .expect_err("duplicate category name should fail");
        assert!(err.is_unique_violation());
    }
}
