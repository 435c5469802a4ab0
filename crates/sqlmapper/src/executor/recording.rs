use super::{AsyncExecutor, Executor, ExecutorConfig, RowStream};
use crate::error::MapperResult;
use crate::rewrite::Dialect;
use crate::value::{Row, Value};
use std::collections::VecDeque;

/// A statement as it reached the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// In-memory executor that records statements instead of running them.
///
/// Implements both [`Executor`] and [`AsyncExecutor`]. Result sets queued with
/// [`push_result`](RecordingExecutor::push_result) are served to statements in
/// order; a statement with nothing queued gets no rows. Every statement counts
/// as a pending write until the next `commit()`.
///
/// Useful for exercising code written against the executor traits without a
/// database.
#[derive(Debug)]
pub struct RecordingExecutor {
    dialect: Dialect,
    config: ExecutorConfig,
    statements: Vec<RecordedStatement>,
    results: VecDeque<Vec<Row>>,
    pending_writes: usize,
    commits: usize,
}

impl Default for RecordingExecutor {
    fn default() -> Self {
        Self::new(Dialect::question())
    }
}

impl RecordingExecutor {
    /// A recording executor rewriting for `dialect`.
    pub fn new(dialect: Dialect) -> Self {
        Self::with_config(dialect, ExecutorConfig::default())
    }

    pub fn with_config(dialect: Dialect, config: ExecutorConfig) -> Self {
        Self {
            dialect: config.dialect(dialect),
            config,
            statements: Vec::new(),
            results: VecDeque::new(),
            pending_writes: 0,
            commits: 0,
        }
    }

    /// Queue the rows returned by the next statement without a result yet.
    pub fn push_result(&mut self, rows: Vec<Row>) -> &mut Self {
        self.results.push_back(rows);
        self
    }

    /// Every statement run so far, oldest first.
    pub fn statements(&self) -> &[RecordedStatement] {
        &self.statements
    }

    /// Take the recorded statements, leaving the log empty.
    pub fn take_statements(&mut self) -> Vec<RecordedStatement> {
        std::mem::take(&mut self.statements)
    }

    /// Number of commits that finalized at least one write.
    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn has_pending_writes(&self) -> bool {
        self.pending_writes > 0
    }

    fn record(&mut self, sql: &str, params: &[Value]) -> Vec<Row> {
        self.statements.push(RecordedStatement {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        self.pending_writes += 1;
        self.results.pop_front().unwrap_or_default()
    }

    fn finish_commit(&mut self) {
        if self.pending_writes == 0 {
            return;
        }
        tracing::debug!(target: "sqlmapper", writes = self.pending_writes, "commit");
        self.pending_writes = 0;
        self.commits += 1;
    }
}

impl Executor for RecordingExecutor {
    type Rows = std::iter::Map<std::vec::IntoIter<Row>, fn(Row) -> MapperResult<Row>>;

    fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    fn run_statement(&mut self, sql: &str, params: &[Value]) -> MapperResult<Self::Rows> {
        let rows = self.record(sql, params);
        Ok(rows.into_iter().map(Ok as fn(Row) -> MapperResult<Row>))
    }

    fn commit(&mut self) -> MapperResult<()> {
        self.finish_commit();
        Ok(())
    }
}

impl AsyncExecutor for RecordingExecutor {
    fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    async fn run_statement(&mut self, sql: &str, params: &[Value]) -> MapperResult<RowStream> {
        Ok(RowStream::from_rows(self.record(sql, params)))
    }

    async fn commit(&mut self) -> MapperResult<()> {
        self.finish_commit();
        Ok(())
    }
}
