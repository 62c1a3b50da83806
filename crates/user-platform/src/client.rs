//! Generic client trait for unified database access.

use crate::error::{OrmError, OrmResult};
use crate::row::ColumnSource;
use crate::statement::BoundStatement;
use std::future::Future;
use std::sync::Arc;

/// Max SQL length (bytes) emitted in log events.
const LOG_SQL_MAX: usize = 200;

/// A connection that can run bound statements.
///
/// Repositories are generic over this trait, so they accept a plain
/// `tokio_postgres::Client`, a lazily connecting [`LazyClient`](crate::LazyClient),
/// or any test double.
pub trait GenericClient: Send + Sync {
    /// Row type returned by queries.
    type Row: ColumnSource + Send;

    /// Execute a query and return all rows, fully materialized.
    fn query(
        &self,
        stmt: &BoundStatement,
    ) -> impl Future<Output = OrmResult<Vec<Self::Row>>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute(&self, stmt: &BoundStatement) -> impl Future<Output = OrmResult<u64>> + Send;
}

impl GenericClient for tokio_postgres::Client {
    type Row = tokio_postgres::Row;

    async fn query(&self, stmt: &BoundStatement) -> OrmResult<Vec<Self::Row>> {
        log_statement(stmt);
        let params = stmt.params_ref();
        tokio_postgres::Client::query(self, stmt.sql(), &params)
            .await
            .map_err(OrmError::from_db_error)
    }

    async fn execute(&self, stmt: &BoundStatement) -> OrmResult<u64> {
        log_statement(stmt);
        let params = stmt.params_ref();
        tokio_postgres::Client::execute(self, stmt.sql(), &params)
            .await
            .map_err(OrmError::from_db_error)
    }
}

impl<C: GenericClient> GenericClient for Arc<C> {
    type Row = C::Row;

    fn query(
        &self,
        stmt: &BoundStatement,
    ) -> impl Future<Output = OrmResult<Vec<Self::Row>>> + Send {
        C::query(self, stmt)
    }

    fn execute(&self, stmt: &BoundStatement) -> impl Future<Output = OrmResult<u64>> + Send {
        C::execute(self, stmt)
    }
}

/// Emit the statement about to run at debug level.
pub(crate) fn log_statement(stmt: &BoundStatement) {
    tracing::debug!(
        target: "user_platform.sql",
        kind = ?stmt.kind(),
        params = stmt.params().len(),
        sql = %truncate_sql(stmt.sql(), LOG_SQL_MAX),
        "executing statement"
    );
}

/// Truncate on a char boundary, appending `...` when shortened.
fn truncate_sql(sql: &str, max: usize) -> String {
    if sql.len() <= max {
        return sql.to_string();
    }
    let mut end = max;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &sql[..end])
}

#[cfg(test)]
mod tests {
    use super::truncate_sql;

    #[test]
    fn truncate_keeps_short_sql() {
        assert_eq!(truncate_sql("SELECT 1", 200), "SELECT 1");
    }

    #[test]
    fn truncate_respects_char_boundary() {
        assert_eq!(truncate_sql("SELECT 'é'", 9), "SELECT '...");
    }
}
