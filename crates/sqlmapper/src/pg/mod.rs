//! PostgreSQL executor built on `tokio-postgres`.
//!
//! [`PgExecutor`] implements [`AsyncExecutor`] over a single connection it
//! owns. Templates are rewritten with [`Dialect::postgres`] (`$1, $2, ...`),
//! arguments are bound through `ToSql for Value`, and result columns are
//! decoded into [`Value`]s.
//!
//! # Example
//!
//! ```ignore
//! use sqlmapper::{AsyncExecutor, ExecutorConfig, PgExecutor, Value, args};
//!
//! let mut pg = PgExecutor::connect(&database_url, ExecutorConfig::new()).await?;
//! pg.create_tables([&book]).await?;
//! let dune = book.from_ordered([Value::from(1), Value::from("Dune")])?;
//! pg.execute("INSERT INTO ?", &args![dune]).await?;
//! pg.commit().await?;
//! ```

mod types;

use crate::error::{MapperError, MapperResult};
use crate::executor::{AsyncExecutor, ExecutorConfig, RowStream};
use crate::rewrite::Dialect;
use crate::value::{Row, Value};
use futures_util::StreamExt;
use tokio_postgres::NoTls;
use tokio_postgres::types::ToSql;

/// A connection a [`PgExecutor`] can run statements on.
pub trait PgConnection: Send + Sync {
    fn client(&self) -> &tokio_postgres::Client;
}

impl PgConnection for tokio_postgres::Client {
    fn client(&self) -> &tokio_postgres::Client {
        self
    }
}

#[cfg(feature = "pool")]
impl PgConnection for deadpool_postgres::Client {
    fn client(&self) -> &tokio_postgres::Client {
        self
    }
}

/// Suspend-capable executor over one PostgreSQL connection.
///
/// With implicit transactions enabled (the default), a `BEGIN` is issued
/// before the first statement following a commit, and [`commit`] sends
/// `COMMIT`. Engine errors are returned as [`MapperError::Query`] untouched;
/// after one, the open transaction is aborted until [`rollback`] or
/// [`commit`] ends it.
///
/// [`commit`]: AsyncExecutor::commit
/// [`rollback`]: PgExecutor::rollback
pub struct PgExecutor<C = tokio_postgres::Client> {
    conn: C,
    dialect: Dialect,
    config: ExecutorConfig,
    in_transaction: bool,
}

impl PgExecutor<tokio_postgres::Client> {
    /// Connect with `NoTls` and spawn the connection driver on the current runtime.
    pub async fn connect(database_url: &str, config: ExecutorConfig) -> MapperResult<Self> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(target: "sqlmapper", error = %e, "postgres connection error");
            }
        });
        Ok(Self::new(client, config))
    }
}

impl<C: PgConnection> PgExecutor<C> {
    /// Wrap an established connection, rewriting with [`Dialect::postgres`].
    pub fn new(conn: C, config: ExecutorConfig) -> Self {
        Self::with_dialect(conn, Dialect::postgres(), config)
    }

    /// Wrap an established connection with a custom dialect, e.g. one
    /// recognising `:name` instead of `?` as the placeholder.
    ///
    /// The dialect's mark must be one PostgreSQL understands (`$n`).
    pub fn with_dialect(conn: C, dialect: Dialect, config: ExecutorConfig) -> Self {
        Self {
            conn,
            dialect: config.dialect(dialect),
            config,
            in_transaction: false,
        }
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn into_connection(self) -> C {
        self.conn
    }

    /// Whether an implicit transaction is open.
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Discard pending writes. A no-op when nothing is pending.
    pub async fn rollback(&mut self) -> MapperResult<()> {
        if !self.in_transaction {
            return Ok(());
        }
        self.in_transaction = false;
        tracing::debug!(target: "sqlmapper", "ROLLBACK");
        self.conn.client().batch_execute("ROLLBACK").await?;
        Ok(())
    }

    async fn begin_if_needed(&mut self) -> MapperResult<()> {
        if !self.config.implicit_transactions || self.in_transaction {
            return Ok(());
        }
        tracing::debug!(target: "sqlmapper", "BEGIN");
        self.conn.client().batch_execute("BEGIN").await?;
        self.in_transaction = true;
        Ok(())
    }
}

impl<C: PgConnection> AsyncExecutor for PgExecutor<C> {
    fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    async fn run_statement(&mut self, sql: &str, params: &[Value]) -> MapperResult<RowStream> {
        self.begin_if_needed().await?;
        let params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|v| v as &(dyn ToSql + Sync)).collect();
        let stream = self
            .conn
            .client()
            .query_raw(sql, params.iter().copied())
            .await?;
        Ok(RowStream::new(stream.map(|row| decode_row(&row?))))
    }

    async fn commit(&mut self) -> MapperResult<()> {
        if !self.in_transaction {
            return Ok(());
        }
        self.in_transaction = false;
        tracing::debug!(target: "sqlmapper", "COMMIT");
        self.conn.client().batch_execute("COMMIT").await?;
        Ok(())
    }
}

fn decode_row(row: &tokio_postgres::Row) -> MapperResult<Row> {
    (0..row.len())
        .map(|idx| {
            row.try_get::<_, Value>(idx)
                .map_err(|e| MapperError::decode(row.columns()[idx].name(), e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_keeps_the_driver_error() {
        let Err(err) =
            PgExecutor::connect("postgres://localhost:notaport/db", ExecutorConfig::new()).await
        else {
            panic!("connected with an invalid port");
        };
        assert!(matches!(err, MapperError::Query(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.is_engine_error());
    }
}
