use std::sync::Arc;

use sqlx::{Error, Sqlite, Transaction};

use crate::configs::Storage;
use crate::models::Bill;

pub struct BillRepository {
    storage: Arc<Storage>,
}

impl BillRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

impl BillRepository {
    // Create new bill record
    pub async fn create(
        &self,
        item: &Bill,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<i32, Error> {
        let id = sqlx::query(
            r#"
            INSERT INTO bills (device, session_id, power_used, price, month, year, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(item.device)
        .bind(&item.session_id)
        .bind(item.power_used)
        .bind(item.price)
        .bind(item.month)
        .bind(item.year)
        .bind(item.created_at)
        .execute(&mut **transaction)
        .await?
        .last_insert_rowid();

        Ok(id as i32)
    }

    // Remove every record a session stored for a device
    pub async fn delete_by_session(
        &self,
        device: i32,
        session_id: &str,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<u64, Error> {
        let removed = sqlx::query("DELETE FROM bills WHERE device = ? AND session_id = ?")
            .bind(device)
            .bind(session_id)
            .execute(&mut **transaction)
            .await?
            .rows_affected();

        Ok(removed)
    }

    pub async fn find_by_session(&self, device: i32, session_id: &str) -> Result<Vec<Bill>, Error> {
        let bills: Vec<Bill> = sqlx::query_as("SELECT * FROM bills WHERE device = ? AND session_id = ? ORDER BY id")
            .bind(device)
            .bind(session_id)
            .fetch_all(self.storage.get_pool())
            .await?;

        Ok(bills)
    }

    // Sum energy and price of a device over one calendar month
    pub async fn sum_by_period(&self, device: i32, month: i32, year: i32) -> Result<(f64, f64), Error> {
        let totals: (f64, f64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(power_used), 0.0), COALESCE(SUM(price), 0.0)
            FROM bills
            WHERE device = ? AND month = ? AND year = ?
            "#,
        )
        .bind(device)
        .bind(month)
        .bind(year)
        .fetch_one(self.storage.get_pool())
        .await?;

        Ok(totals)
    }
}
