use super::{ExecutorConfig, render_table_ddls};
use crate::error::MapperResult;
use crate::model::{RecordInstance, RecordSchema};
use crate::rewrite::{Arg, Dialect, RewriteResult, rewrite};
use crate::template::QueryTemplate;
use crate::value::{Row, Value};
use futures_core::Stream;
use futures_util::TryStreamExt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Executor whose operations may suspend.
///
/// Rewriting happens synchronously when a method is called; the returned
/// future only suspends while a statement is with the engine. `execute_many`
/// runs its items one after another, never concurrently.
pub trait AsyncExecutor: Send {
    /// Dialect used to rewrite templates for this engine.
    fn dialect(&self) -> &Dialect;

    fn config(&self) -> &ExecutorConfig;

    /// Hand a final statement and its flattened arguments to the engine.
    fn run_statement(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = MapperResult<RowStream>> + Send;

    /// Finalize pending writes. A no-op when nothing is pending.
    fn commit(&mut self) -> impl std::future::Future<Output = MapperResult<()>> + Send;

    /// Rewrite `template` for this executor's dialect without running it.
    fn prepare(&self, template: &QueryTemplate, args: &[Arg]) -> MapperResult<RewriteResult> {
        rewrite(template, args, self.dialect())
    }

    /// Rewrite and run `template`, returning its raw rows.
    fn execute<T>(
        &mut self,
        template: T,
        args: &[Arg],
    ) -> impl std::future::Future<Output = MapperResult<RowStream>> + Send
    where
        T: Into<QueryTemplate>,
    {
        let prepared = self.prepare(&template.into(), args);
        async move {
            let prepared = prepared?;
            self.config()
                .logger
                .statement(&prepared.query, prepared.arguments.len());
            self.run_statement(&prepared.query, &prepared.arguments)
                .await
        }
    }

    /// Like [`execute`](AsyncExecutor::execute), mapping every row into a record of `schema`.
    fn execute_as<T>(
        &mut self,
        template: T,
        args: &[Arg],
        schema: &Arc<RecordSchema>,
    ) -> impl std::future::Future<Output = MapperResult<RecordStream>> + Send
    where
        T: Into<QueryTemplate>,
    {
        let schema = Arc::clone(schema);
        let rows = self.execute(template, args);
        async move { Ok(RecordStream::new(rows.await?, schema)) }
    }

    /// Run the same template once per argument list, in order.
    ///
    /// Each item is rewritten and awaited before the next one starts.
    fn execute_many<T, A>(
        &mut self,
        template: T,
        arg_lists: &[A],
    ) -> impl std::future::Future<Output = MapperResult<Vec<RowStream>>> + Send
    where
        T: Into<QueryTemplate>,
        A: AsRef<[Arg]> + Sync,
    {
        let template = template.into();
        async move {
            let mut results = Vec::with_capacity(arg_lists.len());
            for args in arg_lists {
                let prepared = self.prepare(&template, args.as_ref())?;
                self.config()
                    .logger
                    .statement(&prepared.query, prepared.arguments.len());
                results.push(
                    self.run_statement(&prepared.query, &prepared.arguments)
                        .await?,
                );
            }
            Ok(results)
        }
    }

    /// [`execute_many`](AsyncExecutor::execute_many) with every row mapped into a record of `schema`.
    fn execute_many_as<T, A>(
        &mut self,
        template: T,
        arg_lists: &[A],
        schema: &Arc<RecordSchema>,
    ) -> impl std::future::Future<Output = MapperResult<Vec<RecordStream>>> + Send
    where
        T: Into<QueryTemplate>,
        A: AsRef<[Arg]> + Sync,
    {
        let schema = Arc::clone(schema);
        let results = self.execute_many(template, arg_lists);
        async move {
            Ok(results
                .await?
                .into_iter()
                .map(|rows| RecordStream::new(rows, Arc::clone(&schema)))
                .collect())
        }
    }

    /// Create the table of every schema, then commit.
    ///
    /// All DDL is rendered before the first await, so a schema without a table
    /// name fails the call before any statement runs.
    fn create_tables<I, S>(
        &mut self,
        schemas: I,
    ) -> impl std::future::Future<Output = MapperResult<()>> + Send
    where
        I: IntoIterator<Item = S>,
        S: AsRef<RecordSchema>,
    {
        let ddls = render_table_ddls(schemas);
        async move {
            let ddls = ddls?;
            tracing::debug!(target: "sqlmapper", tables = ddls.len(), "creating tables");
            for ddl in &ddls {
                self.config().logger.statement(ddl, 0);
                self.run_statement(ddl, &[]).await?.collect_rows().await?;
            }
            self.commit().await
        }
    }
}

/// A stream of rows produced by one statement.
#[must_use]
pub struct RowStream {
    inner: Pin<Box<dyn Stream<Item = MapperResult<Row>> + Send>>,
}

impl RowStream {
    /// Create a new `RowStream` from any compatible stream.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = MapperResult<Row>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }

    /// A stream over rows that are already in memory.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self::new(futures_util::stream::iter(rows.into_iter().map(Ok)))
    }

    pub fn empty() -> Self {
        Self::from_rows(Vec::new())
    }

    /// Drain the stream.
    pub async fn collect_rows(self) -> MapperResult<Vec<Row>> {
        self.try_collect().await
    }
}

impl Stream for RowStream {
    type Item = MapperResult<Row>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Rows mapped into records of one schema as they arrive.
#[must_use]
pub struct RecordStream {
    inner: RowStream,
    schema: Arc<RecordSchema>,
}

impl RecordStream {
    pub fn new(inner: RowStream, schema: Arc<RecordSchema>) -> Self {
        Self { inner, schema }
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Drain the stream.
    pub async fn collect_records(self) -> MapperResult<Vec<RecordInstance>> {
        self.try_collect().await
    }
}

impl Stream for RecordStream {
    type Item = MapperResult<RecordInstance>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(row))) => Poll::Ready(Some(self.schema.from_ordered(row))),
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}
