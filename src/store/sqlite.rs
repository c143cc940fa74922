//! SQLite record store
//!
//! Schema bootstrap uses `CREATE TABLE IF NOT EXISTS` and is safe to re-run on
//! every startup. This backend is lenient: `upsert` on an unknown id creates
//! the record instead of failing.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Row, SqlitePool,
};
use uuid::Uuid;

use crate::{
    dates::{self, RawDate},
    error::AppResult,
    models::StoredRecord,
};

use super::RecordStore;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `url` and bootstrap the schema
    pub async fn connect(url: &str, max_connections: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(sqlx::Error::from)?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS loans (
                id                   TEXT PRIMARY KEY NOT NULL,
                requester_name       TEXT NOT NULL,
                requester_email      TEXT NOT NULL,
                requester_id         TEXT NOT NULL,
                department           TEXT NOT NULL,
                cost_center          TEXT NOT NULL,
                requester_phone      TEXT NOT NULL,
                supervisor_name      TEXT NOT NULL,
                supervisor_email     TEXT NOT NULL,
                reason               TEXT NOT NULL,
                vehicle_id           TEXT NOT NULL,
                agreed_to_rules      INTEGER NOT NULL DEFAULT 0,
                expected_return_date TEXT,
                actual_return_date   TEXT,
                registered_at        TEXT NOT NULL,
                card_id              TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    fn bind_record<'q>(
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
        id: &'q str,
        record: &'q StoredRecord,
        expected: Option<NaiveDate>,
        actual: Option<NaiveDate>,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        query
            .bind(id)
            .bind(&record.requester_name)
            .bind(&record.requester_email)
            .bind(&record.requester_id)
            .bind(&record.department)
            .bind(&record.cost_center)
            .bind(&record.requester_phone)
            .bind(&record.supervisor_name)
            .bind(&record.supervisor_email)
            .bind(&record.reason)
            .bind(&record.vehicle_id)
            .bind(record.agreed_to_rules)
            .bind(expected)
            .bind(actual)
            .bind(record.registered_at)
            .bind(&record.card_id)
    }
}

const UPSERT_SQL: &str = r#"
INSERT INTO loans (
    id, requester_name, requester_email, requester_id, department, cost_center,
    requester_phone, supervisor_name, supervisor_email, reason, vehicle_id,
    agreed_to_rules, expected_return_date, actual_return_date, registered_at, card_id
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
ON CONFLICT(id) DO UPDATE SET
    requester_name = excluded.requester_name,
    requester_email = excluded.requester_email,
    requester_id = excluded.requester_id,
    department = excluded.department,
    cost_center = excluded.cost_center,
    requester_phone = excluded.requester_phone,
    supervisor_name = excluded.supervisor_name,
    supervisor_email = excluded.supervisor_email,
    reason = excluded.reason,
    vehicle_id = excluded.vehicle_id,
    agreed_to_rules = excluded.agreed_to_rules,
    expected_return_date = excluded.expected_return_date,
    actual_return_date = excluded.actual_return_date,
    registered_at = excluded.registered_at,
    card_id = excluded.card_id
"#;

#[async_trait]
impl RecordStore for SqliteStore {
    async fn list_all(&self) -> AppResult<Vec<(String, StoredRecord)>> {
        let rows = sqlx::query("SELECT * FROM loans ORDER BY registered_at")
            .fetch_all(&self.pool)
            .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let expected: Option<NaiveDate> = row.get("expected_return_date");
            let actual: Option<NaiveDate> = row.get("actual_return_date");
            let registered_at: DateTime<Utc> = row.get("registered_at");

            let record = StoredRecord {
                requester_name: row.get("requester_name"),
                requester_email: row.get("requester_email"),
                requester_id: row.get("requester_id"),
                department: row.get("department"),
                cost_center: row.get("cost_center"),
                requester_phone: row.get("requester_phone"),
                supervisor_name: row.get("supervisor_name"),
                supervisor_email: row.get("supervisor_email"),
                reason: row.get("reason"),
                vehicle_id: row.get("vehicle_id"),
                agreed_to_rules: row.get("agreed_to_rules"),
                expected_return_date: expected.map_or(RawDate::Null, RawDate::Date),
                actual_return_date: actual.map_or(RawDate::Null, RawDate::Date),
                registered_at,
                card_id: row.get("card_id"),
            };
            result.push((row.get::<String, _>("id"), record));
        }

        Ok(result)
    }

    async fn insert(&self, record: &StoredRecord) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        let expected = dates::to_storage(&record.expected_return_date).date();
        let actual = dates::to_storage(&record.actual_return_date).date();

        Self::bind_record(sqlx::query(UPSERT_SQL), &id, record, expected, actual)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn upsert(&self, record_id: &str, record: &StoredRecord) -> AppResult<()> {
        let expected = dates::to_storage(&record.expected_return_date).date();
        let actual = dates::to_storage(&record.actual_return_date).date();

        Self::bind_record(sqlx::query(UPSERT_SQL), record_id, record, expected, actual)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
