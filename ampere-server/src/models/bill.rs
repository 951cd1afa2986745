use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Table;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bill {
    pub id: i32,
    /// Device number, 1 or 2
    pub device: i32,
    pub session_id: String,
    /// Energy in Wh
    pub power_used: f64,
    pub price: f64,
    /// Billing month, 1-12
    pub month: i32,
    pub year: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Clone)]
pub struct BillTable;

impl Table for BillTable {
    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS bills (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                device INTEGER NOT NULL,
                session_id TEXT NOT NULL,
                power_used REAL NOT NULL,
                price REAL NOT NULL,
                month INTEGER NOT NULL,
                year INTEGER NOT NULL,
                created_at TIMESTAMP NOT NULL
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS bills;")
    }
}
