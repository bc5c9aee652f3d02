// crates/db/src/queries/jobs.rs
//! Job reads, inserts, and the atomic transition update.

use serde::Serialize;
use sqlx::Row;
use ts_rs::TS;

use taskmarket_core::{Job, JobPatch};

use super::{booking_mode_str, job_status_str, parse_booking_mode, parse_job_status};
use crate::{Database, DbResult};

/// A job with its aggregated bid count (for listings).
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct JobWithBidCount {
    #[serde(flatten)]
    pub job: Job,
    #[ts(type = "number")]
    pub bid_count: i64,
}

fn job_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Job, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let booking_mode: String = row.try_get("booking_mode")?;
    Ok(Job {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        category_id: row.try_get("category_id")?,
        booking_mode: parse_booking_mode(&booking_mode)?,
        status: parse_job_status(&status)?,
        price: row.try_get("price")?,
        accept_price: row.try_get("accept_price")?,
        scheduled_at: row.try_get("scheduled_at")?,
        accept_until: row.try_get("accept_until")?,
        customer_id: row.try_get("customer_id")?,
        provider_id: row.try_get("provider_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl Database {
    pub async fn insert_job(&self, job: &Job) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO jobs (
                id, title, description, category_id, booking_mode, status,
                price, accept_price, scheduled_at, accept_until,
                customer_id, provider_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job.id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.category_id)
        .bind(booking_mode_str(job.booking_mode))
        .bind(job_status_str(job.status))
        .bind(job.price)
        .bind(job.accept_price)
        .bind(job.scheduled_at)
        .bind(job.accept_until)
        .bind(&job.customer_id)
        .bind(&job.provider_id)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_job(&self, id: &str) -> DbResult<Option<Job>> {
        let row = sqlx::query("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(job_from_row).transpose().map_err(Into::into)
    }

    /// All jobs, newest first, each with its bid count.
    pub async fn list_jobs(&self) -> DbResult<Vec<JobWithBidCount>> {
        let rows = sqlx::query(
            r#"
            SELECT j.*, COUNT(b.id) AS bid_count
            FROM jobs j
            LEFT JOIN bids b ON b.job_id = j.id
            GROUP BY j.id
            ORDER BY j.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(JobWithBidCount {
                    job: job_from_row(row)?,
                    bid_count: row.try_get("bid_count")?,
                })
            })
            .collect::<Result<_, sqlx::Error>>()
            .map_err(Into::into)
    }

    /// Apply a validated transition atomically.
    ///
    /// The UPDATE re-asserts the expected current status (`patch.from`), so
    /// out of any number of concurrent callers racing the same job exactly
    /// one update matches. Returns `false` when the row was already transitioned
    /// by someone else — the caller lost the race.
    ///
    /// `deadline_floor` additionally requires `accept_until >= ?` in the
    /// predicate; the instant-book claim passes the request-time clock here
    /// so an expired window can never be claimed, even if the validation
    /// snapshot was read moments earlier.
    ///
    /// `accept_until` is cleared on every transition: the window exists only
    /// while an instant-book job is `Open`.
    pub async fn apply_job_patch(
        &self,
        job_id: &str,
        patch: &JobPatch,
        now_ms: i64,
        deadline_floor: Option<i64>,
    ) -> DbResult<bool> {
        let result = match deadline_floor {
            Some(floor) => {
                sqlx::query(
                    r#"
                    UPDATE jobs SET
                        status = ?,
                        provider_id = COALESCE(?, provider_id),
                        accept_price = COALESCE(?, accept_price),
                        accept_until = NULL,
                        updated_at = ?
                    WHERE id = ? AND status = ? AND accept_until >= ?
                    "#,
                )
                .bind(job_status_str(patch.to))
                .bind(&patch.provider_id)
                .bind(patch.accept_price)
                .bind(now_ms)
                .bind(job_id)
                .bind(job_status_str(patch.from))
                .bind(floor)
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    UPDATE jobs SET
                        status = ?,
                        provider_id = COALESCE(?, provider_id),
                        accept_price = COALESCE(?, accept_price),
                        accept_until = NULL,
                        updated_at = ?
                    WHERE id = ? AND status = ?
                    "#,
                )
                .bind(job_status_str(patch.to))
                .bind(&patch.provider_id)
                .bind(patch.accept_price)
                .bind(now_ms)
                .bind(job_id)
                .bind(job_status_str(patch.from))
                .execute(&self.pool)
                .await?
            }
        };

        Ok(result.rows_affected() == 1)
    }
}
