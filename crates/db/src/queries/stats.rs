// crates/db/src/queries/stats.rs
//! Dashboard statistics: per-user job counts and recent activity.

use serde::Serialize;
use sqlx::Row;
use ts_rs::TS;

use taskmarket_core::JobStatus;

use super::parse_job_status;
use crate::{Database, DbResult};

/// Dashboard stats for a customer.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct CustomerStats {
    #[ts(type = "number")]
    pub jobs_posted: i64,
    #[ts(type = "number")]
    pub jobs_completed: i64,
    #[ts(type = "number")]
    pub active_jobs: i64,
}

/// Dashboard stats for a provider.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct ProviderStats {
    #[ts(type = "number")]
    pub jobs_completed: i64,
    pub avg_rating: f64,
    #[ts(type = "number")]
    pub active_jobs: i64,
}

/// A recent-activity line: job title, status, and last update time.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub title: String,
    pub status: JobStatus,
    #[ts(type = "number")]
    pub updated_at: i64,
}

const ACTIVITY_LIMIT: i64 = 5;

impl Database {
    pub async fn customer_stats(&self, customer_id: &str) -> DbResult<CustomerStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS posted,
                SUM(status = 'COMPLETED') AS completed,
                SUM(status IN ('OPEN', 'BOOKED', 'ASSIGNED')) AS active
            FROM jobs WHERE customer_id = ?
            "#,
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(CustomerStats {
            jobs_posted: row.try_get("posted")?,
            jobs_completed: row.try_get::<Option<i64>, _>("completed")?.unwrap_or(0),
            active_jobs: row.try_get::<Option<i64>, _>("active")?.unwrap_or(0),
        })
    }

    pub async fn provider_stats(&self, provider_id: &str) -> DbResult<ProviderStats> {
        let row = sqlx::query(
            r#"
            SELECT
                SUM(status = 'COMPLETED') AS completed,
                SUM(status IN ('OPEN', 'BOOKED', 'ASSIGNED')) AS active
            FROM jobs WHERE provider_id = ?
            "#,
        )
        .bind(provider_id)
        .fetch_one(&self.pool)
        .await?;

        let avg: (Option<f64>,) =
            sqlx::query_as("SELECT AVG(score) FROM ratings WHERE provider_id = ?")
                .bind(provider_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(ProviderStats {
            jobs_completed: row.try_get::<Option<i64>, _>("completed")?.unwrap_or(0),
            avg_rating: avg.0.unwrap_or(0.0),
            active_jobs: row.try_get::<Option<i64>, _>("active")?.unwrap_or(0),
        })
    }

    /// The five most recently updated jobs the user participates in, as
    /// customer or provider.
    pub async fn recent_activity(
        &self,
        user_id: &str,
        as_provider: bool,
    ) -> DbResult<Vec<ActivityEntry>> {
        let column = if as_provider {
            "provider_id"
        } else {
            "customer_id"
        };
        let rows = sqlx::query(&format!(
            "SELECT title, status, updated_at FROM jobs WHERE {column} = ? \
             ORDER BY updated_at DESC LIMIT {ACTIVITY_LIMIT}"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let status: String = row.try_get("status")?;
                Ok(ActivityEntry {
                    title: row.try_get("title")?,
                    status: parse_job_status(&status)?,
                    updated_at: row.try_get("updated_at")?,
                })
            })
            .collect::<Result<_, sqlx::Error>>()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmarket_core::{create_job, BookingMode, JobDraft, JobPatch, Rating};

    const NOW: i64 = 1_700_000_000_000;

    async fn seed_job(
        db: &Database,
        customer: &str,
        provider: Option<&str>,
        status: JobStatus,
        at: i64,
    ) {
        let mut job = create_job(
            customer,
            JobDraft {
                title: format!("job at {at}"),
                description: None,
                category_id: "cat".into(),
                booking_mode: BookingMode::BidAndQuote,
                price: 10.0,
                accept_price: None,
            },
            at,
        );
        job.id = format!("job-{at}");
        db.insert_job(&job).await.unwrap();
        // Completed/Cancelled are reached through Assigned first.
        if status.is_terminal() {
            let assign = JobPatch {
                from: JobStatus::Open,
                to: JobStatus::Assigned,
                provider_id: provider.map(String::from),
                accept_price: Some(10.0),
            };
            db.apply_job_patch(&job.id, &assign, at, None).await.unwrap();
            let finish = JobPatch {
                from: JobStatus::Assigned,
                to: status,
                provider_id: None,
                accept_price: None,
            };
            db.apply_job_patch(&job.id, &finish, at + 1, None).await.unwrap();
        } else if status != JobStatus::Open {
            let patch = JobPatch {
                from: JobStatus::Open,
                to: status,
                provider_id: provider.map(String::from),
                accept_price: None,
            };
            db.apply_job_patch(&job.id, &patch, at, None).await.unwrap();
        }
    }

    #[tokio::test]
    async fn customer_stats_count_by_status() {
        let db = Database::new_in_memory().await.unwrap();
        seed_job(&db, "cust-1", None, JobStatus::Open, NOW).await;
        seed_job(&db, "cust-1", Some("p1"), JobStatus::Assigned, NOW + 1).await;
        seed_job(&db, "cust-1", Some("p1"), JobStatus::Completed, NOW + 2).await;
        seed_job(&db, "cust-2", None, JobStatus::Open, NOW + 3).await;

        let stats = db.customer_stats("cust-1").await.unwrap();
        assert_eq!(stats.jobs_posted, 3);
        assert_eq!(stats.jobs_completed, 1);
        assert_eq!(stats.active_jobs, 2);

        // A user with no jobs gets zeroes, not NULL errors.
        let empty = db.customer_stats("nobody").await.unwrap();
        assert_eq!(empty.jobs_posted, 0);
        assert_eq!(empty.jobs_completed, 0);
        assert_eq!(empty.active_jobs, 0);
    }

    #[tokio::test]
    async fn provider_stats_average_their_ratings() {
        let db = Database::new_in_memory().await.unwrap();
        seed_job(&db, "cust-1", Some("p1"), JobStatus::Completed, NOW).await;
        seed_job(&db, "cust-1", Some("p1"), JobStatus::Booked, NOW + 1).await;
        for (job, score) in [("j1", 4), ("j2", 2)] {
            db.insert_rating(&Rating {
                id: format!("r-{job}"),
                job_id: job.into(),
                provider_id: "p1".into(),
                score,
                comment: None,
                created_at: NOW,
            })
            .await
            .unwrap();
        }

        let stats = db.provider_stats("p1").await.unwrap();
        assert_eq!(stats.jobs_completed, 1);
        assert_eq!(stats.active_jobs, 1);
        assert_eq!(stats.avg_rating, 3.0);

        let unrated = db.provider_stats("p2").await.unwrap();
        assert_eq!(unrated.avg_rating, 0.0);
    }

    #[tokio::test]
    async fn recent_activity_is_capped_and_newest_first() {
        let db = Database::new_in_memory().await.unwrap();
        for i in 0..7 {
            seed_job(&db, "cust-1", None, JobStatus::Open, NOW + i).await;
        }

        let activity = db.recent_activity("cust-1", false).await.unwrap();
        assert_eq!(activity.len(), 5);
        assert_eq!(activity[0].title, format!("job at {}", NOW + 6));
        assert!(activity.windows(2).all(|w| w[0].updated_at >= w[1].updated_at));

        assert!(db.recent_activity("cust-1", true).await.unwrap().is_empty());
    }
}
