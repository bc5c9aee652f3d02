// crates/db/src/queries/bids.rs
//! Bid inserts and listings. Bids are immutable once created.

use serde::Serialize;
use sqlx::Row;
use ts_rs::TS;

use taskmarket_core::Bid;

use crate::{Database, DbResult};

/// A bid joined with the submitting provider's identity and reputation,
/// in submission (storage) order.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[serde(rename_all = "camelCase")]
pub struct BidWithProvider {
    #[serde(flatten)]
    pub bid: Bid,
    pub provider_name: Option<String>,
    pub provider_rating: Option<f64>,
}

fn bid_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Bid, sqlx::Error> {
    Ok(Bid {
        id: row.try_get("id")?,
        job_id: row.try_get("job_id")?,
        provider_id: row.try_get("provider_id")?,
        price: row.try_get("price")?,
        note: row.try_get("note")?,
        eta: row.try_get("eta")?,
        created_at: row.try_get("created_at")?,
    })
}

impl Database {
    pub async fn insert_bid(&self, bid: &Bid) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bids (id, job_id, provider_id, price, note, eta, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&bid.id)
        .bind(&bid.job_id)
        .bind(&bid.provider_id)
        .bind(bid.price)
        .bind(&bid.note)
        .bind(bid.eta)
        .bind(bid.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_bid(&self, id: &str) -> DbResult<Option<Bid>> {
        let row = sqlx::query("SELECT * FROM bids WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(bid_from_row).transpose().map_err(Into::into)
    }

    /// All bids on a job in submission order, with provider name and rating.
    ///
    /// The LEFT JOIN keeps bids whose provider record is missing; their
    /// name and rating come back `None`.
    pub async fn list_bids_for_job(&self, job_id: &str) -> DbResult<Vec<BidWithProvider>> {
        let rows = sqlx::query(
            r#"
            SELECT b.*, u.name AS provider_name, u.rating AS provider_rating
            FROM bids b
            LEFT JOIN users u ON u.id = b.provider_id
            WHERE b.job_id = ?
            ORDER BY b.rowid
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(BidWithProvider {
                    bid: bid_from_row(row)?,
                    provider_name: row.try_get("provider_name")?,
                    provider_rating: row.try_get("provider_rating")?,
                })
            })
            .collect::<Result<_, sqlx::Error>>()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmarket_core::Role;

    fn bid(id: &str, job: &str, provider: &str, price: f64) -> Bid {
        Bid {
            id: id.into(),
            job_id: job.into(),
            provider_id: provider.into(),
            price,
            note: Some("can start tomorrow".into()),
            eta: Some(3),
            created_at: 1_700_000_000_000,
        }
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let db = Database::new_in_memory().await.unwrap();
        let b = bid("bid-1", "job-1", "prov-1", 50.0);
        db.insert_bid(&b).await.unwrap();
        assert_eq!(db.get_bid("bid-1").await.unwrap(), Some(b));
        assert!(db.get_bid("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn listing_keeps_submission_order_and_joins_provider() {
        let db = Database::new_in_memory().await.unwrap();
        db.insert_user(&taskmarket_core::User {
            id: "prov-1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: Role::Provider,
            rating: Some(4.5),
            created_at: 0,
        })
        .await
        .unwrap();

        // Same created_at on purpose: rowid, not the timestamp, is the order.
        db.insert_bid(&bid("bid-b", "job-1", "prov-1", 70.0)).await.unwrap();
        db.insert_bid(&bid("bid-a", "job-1", "prov-2", 60.0)).await.unwrap();
        db.insert_bid(&bid("bid-x", "job-2", "prov-1", 10.0)).await.unwrap();

        let bids = db.list_bids_for_job("job-1").await.unwrap();
        assert_eq!(
            bids.iter().map(|b| b.bid.id.as_str()).collect::<Vec<_>>(),
            vec!["bid-b", "bid-a"]
        );
        assert_eq!(bids[0].provider_name.as_deref(), Some("Ada"));
        assert_eq!(bids[0].provider_rating, Some(4.5));
        // Unknown provider: bid survives, join fields empty.
        assert_eq!(bids[1].provider_name, None);
        assert_eq!(bids[1].provider_rating, None);
    }
}
