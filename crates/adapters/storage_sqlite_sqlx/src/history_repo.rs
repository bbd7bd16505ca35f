//! `SQLite` implementation of [`HistoryRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use ladsim_app::ports::HistoryRepository;
use ladsim_domain::error::{HistoryError, LadsError};
use ladsim_domain::history::HistoryRecord;
use ladsim_domain::id::{HistoryRecordId, NodeId};
use ladsim_domain::time::{Timestamp, now, parse_rfc3339, to_sortable_string};
use ladsim_domain::variant::DataValue;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(HistoryRecord);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let node_id: String = row.try_get("node_id")?;
        let value_json: String = row.try_get("value")?;
        let recorded_at: String = row.try_get("recorded_at")?;

        let node_id: NodeId = node_id
            .parse()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let value: DataValue = serde_json::from_str(&value_json)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let recorded_at =
            parse_rfc3339(&recorded_at).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(HistoryRecord {
            id: HistoryRecordId::from_uuid(id),
            node_id,
            value,
            recorded_at,
        }))
    }
}

const REGISTER: &str = r"
    INSERT INTO history_series (node_id, registered_at) VALUES (?, ?)
    ON CONFLICT (node_id) DO NOTHING
";

const IS_REGISTERED: &str = "SELECT COUNT(*) FROM history_series WHERE node_id = ?";

const INSERT: &str = r"
    INSERT INTO history_records (id, node_id, value, recorded_at)
    SELECT ?, ?, ?, ?
    WHERE EXISTS (SELECT 1 FROM history_series WHERE node_id = ?)
";

const SELECT_IN_RANGE: &str = r"
    SELECT * FROM history_records
    WHERE node_id = ?
      AND (? IS NULL OR recorded_at >= ?)
      AND (? IS NULL OR recorded_at < ?)
    ORDER BY recorded_at ASC, rowid ASC
    LIMIT ?
";

const DELETE_BEFORE: &str = "DELETE FROM history_records WHERE recorded_at < ?";

/// `SQLite`-backed historian.
pub struct SqliteHistoryRepository {
    pool: SqlitePool,
}

impl SqliteHistoryRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl HistoryRepository for SqliteHistoryRepository {
    async fn register(&self, node: NodeId) -> Result<(), LadsError> {
        sqlx::query(REGISTER)
            .bind(node.to_string())
            .bind(to_sortable_string(now()))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn is_registered(&self, node: NodeId) -> Result<bool, LadsError> {
        let (count,): (i64,) = sqlx::query_as(IS_REGISTERED)
            .bind(node.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }

    async fn record(&self, record: HistoryRecord) -> Result<HistoryRecord, LadsError> {
        let value_json =
            serde_json::to_string(&record.value).map_err(|source| StorageError::Encode {
                node: record.node_id,
                source,
            })?;
        let node = record.node_id.to_string();

        let result = sqlx::query(INSERT)
            .bind(record.id.as_uuid())
            .bind(&node)
            .bind(&value_json)
            .bind(to_sortable_string(record.recorded_at))
            .bind(&node)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(HistoryError::NotRegistered(record.node_id).into());
        }
        Ok(record)
    }

    async fn find_in_range(
        &self,
        node: NodeId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
        limit: usize,
    ) -> Result<Vec<HistoryRecord>, LadsError> {
        let from = from.map(to_sortable_string);
        let to = to.map(to_sortable_string);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_IN_RANGE)
            .bind(node.to_string())
            .bind(&from)
            .bind(&from)
            .bind(&to)
            .bind(&to)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn purge_before(&self, before: Timestamp) -> Result<u64, LadsError> {
        let result = sqlx::query(DELETE_BEFORE)
            .bind(to_sortable_string(before))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        tracing::debug!(removed = result.rows_affected(), "history purged");
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use chrono::Duration;
    use ladsim_domain::variant::{ArrayValue, StatusCode, Variant};

    async fn setup() -> SqliteHistoryRepository {
        Config::in_memory().build().await.unwrap().history()
    }

    fn node() -> NodeId {
        NodeId::from_index(17)
    }

    fn record_at(value: f64, recorded_at: Timestamp) -> HistoryRecord {
        HistoryRecord::builder()
            .node_id(node())
            .value(DataValue::from_source(Variant::Double(value)))
            .recorded_at(recorded_at)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_register_series_once() {
        let repo = setup().await;
        assert!(!repo.is_registered(node()).await.unwrap());

        repo.register(node()).await.unwrap();
        repo.register(node()).await.unwrap();

        assert!(repo.is_registered(node()).await.unwrap());
    }

    #[tokio::test]
    async fn should_refuse_records_for_unregistered_series() {
        let repo = setup().await;
        let err = repo.record(record_at(1.0, now())).await.unwrap_err();
        assert!(matches!(
            err,
            LadsError::History(HistoryError::NotRegistered(_))
        ));
    }

    #[tokio::test]
    async fn should_round_trip_well_array_bit_exact() {
        let repo = setup().await;
        repo.register(node()).await.unwrap();
        let wells: Vec<f64> = (0..96)
            .map(|i| (f64::from(i) - 0.417_328_113_209_5).powi(2))
            .collect();
        let record = HistoryRecord::builder()
            .node_id(node())
            .value(DataValue::from_source(wells.clone().into()))
            .build()
            .unwrap();

        repo.record(record.clone()).await.unwrap();
        let found = repo.find_in_range(node(), None, None, 10).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, record.id);
        assert_eq!(found[0].value.status, StatusCode::Good);
        assert_eq!(
            found[0].value.value,
            Variant::Array(ArrayValue::Double(wells))
        );
        assert_eq!(found[0].recorded_at, record.recorded_at);
    }

    #[tokio::test]
    async fn should_return_range_oldest_first_with_exclusive_end() {
        let repo = setup().await;
        repo.register(node()).await.unwrap();
        let start = now();
        for i in (0..5_i32).rev() {
            repo.record(record_at(
                f64::from(i),
                start + Duration::milliseconds(i64::from(i) * 250),
            ))
            .await
            .unwrap();
        }

        let found = repo
            .find_in_range(
                node(),
                Some(start + Duration::milliseconds(250)),
                Some(start + Duration::milliseconds(1_000)),
                10,
            )
            .await
            .unwrap();

        let values: Vec<_> = found.iter().map(|r| r.value.value.clone()).collect();
        assert_eq!(
            values,
            vec![Variant::Double(1.0), Variant::Double(2.0), Variant::Double(3.0)]
        );
    }

    #[tokio::test]
    async fn should_apply_limit() {
        let repo = setup().await;
        repo.register(node()).await.unwrap();
        let start = now();
        for i in 0..4_i32 {
            repo.record(record_at(f64::from(i), start + Duration::seconds(i64::from(i))))
                .await
                .unwrap();
        }
        let found = repo.find_in_range(node(), None, None, 2).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].value.value, Variant::Double(1.0));
    }

    #[tokio::test]
    async fn should_purge_records_before_cutoff() {
        let repo = setup().await;
        repo.register(node()).await.unwrap();
        let start = now();
        repo.record(record_at(1.0, start - Duration::days(2)))
            .await
            .unwrap();
        repo.record(record_at(2.0, start)).await.unwrap();

        let removed = repo.purge_before(start - Duration::days(1)).await.unwrap();

        assert_eq!(removed, 1);
        let remaining = repo.find_in_range(node(), None, None, 10).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].value.value, Variant::Double(2.0));
    }
}
