use crate::error::{DbError, DbResult};
use crate::records::{FieldUpdate, FieldValue, RecordFilter, Table};
use async_trait::async_trait;
use sqlx::{Any, Pool};
use tracing::debug;

/// Record store the webhook handlers write through
///
/// Implementations own their concurrency control; concurrent updates to the
/// same record are last-write-wins.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Apply `fields` to every row of `table` matching `filter`
    ///
    /// Returns the number of rows affected. Matching zero rows is not an
    /// error.
    async fn update(
        &self,
        table: Table,
        filter: &RecordFilter,
        fields: &[FieldUpdate],
    ) -> DbResult<u64>;

    /// Cheap round trip used by health checks
    async fn ping(&self) -> DbResult<()>;
}

/// SQL placeholder flavour of the connected backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Dialect::Postgres
        } else {
            Dialect::Sqlite
        }
    }

    fn placeholder(&self, index: usize, sql_type: Option<&str>) -> String {
        match (self, sql_type) {
            (Dialect::Sqlite, _) => "?".to_string(),
            (Dialect::Postgres, Some(sql_type)) => format!("${}::{}", index, sql_type),
            (Dialect::Postgres, None) => format!("${}", index),
        }
    }
}

/// `DataStore` backed by an sqlx `Any` pool
#[derive(Clone)]
pub struct SqlDataStore {
    pool: Pool<Any>,
    dialect: Dialect,
}

impl SqlDataStore {
    pub fn new(pool: Pool<Any>, dialect: Dialect) -> Self {
        Self { pool, dialect }
    }

    pub fn pool(&self) -> &Pool<Any> {
        &self.pool
    }
}

/// Render the `UPDATE` statement for `fields`
///
/// On PostgreSQL every parameter is bound as text or a plain number, so
/// enum, numeric and timestamp columns get an explicit cast. The key is
/// compared as-is with the parameter cast to the key type, keeping the
/// primary key index usable.
fn build_update(
    dialect: Dialect,
    table: Table,
    filter: &RecordFilter,
    fields: &[FieldUpdate],
) -> String {
    let assignments = fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let sql_type = table.column_type(field.column).or(match field.value {
                FieldValue::Timestamp(_) => Some("timestamptz"),
                _ => None,
            });
            format!("{} = {}", field.column, dialect.placeholder(i + 1, sql_type))
        })
        .collect::<Vec<_>>()
        .join(", ");

    let key_type = (filter.column == "id").then(|| table.key_type());
    let filter_placeholder = dialect.placeholder(fields.len() + 1, key_type);

    format!(
        "UPDATE {} SET {} WHERE {} = {}",
        table, assignments, filter.column, filter_placeholder
    )
}

#[async_trait]
impl DataStore for SqlDataStore {
    async fn update(
        &self,
        table: Table,
        filter: &RecordFilter,
        fields: &[FieldUpdate],
    ) -> DbResult<u64> {
        if fields.is_empty() {
            return Err(DbError::EmptyUpdate(table.to_string()));
        }

        let sql = build_update(self.dialect, table, filter, fields);
        debug!("Executing update: {}", sql);

        let mut query = sqlx::query(&sql);
        for field in fields {
            query = match &field.value {
                FieldValue::Text(text) => query.bind(text.clone()),
                FieldValue::Number(number) => query.bind(*number),
                FieldValue::Timestamp(ts) => query.bind(ts.to_rfc3339()),
                FieldValue::Null => query.bind(Option::<String>::None),
            };
        }
        query = query.bind(filter.value.clone());

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::UpdateFailed {
                table: table.to_string(),
                message: e.to_string(),
            })?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
