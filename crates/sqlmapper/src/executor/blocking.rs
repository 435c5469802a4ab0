use super::{ExecutorConfig, render_table_ddls};
use crate::error::MapperResult;
use crate::model::{RecordInstance, RecordSchema};
use crate::rewrite::{Arg, Dialect, RewriteResult, rewrite};
use crate::template::QueryTemplate;
use crate::value::{Row, Value};
use std::sync::Arc;

/// Executor whose operations complete before returning.
///
/// Statements run when `execute` is called, not when its rows are iterated.
pub trait Executor {
    /// Rows produced by one statement.
    type Rows: Iterator<Item = MapperResult<Row>>;

    /// Dialect used to rewrite templates for this engine.
    fn dialect(&self) -> &Dialect;

    fn config(&self) -> &ExecutorConfig;

    /// Hand a final statement and its flattened arguments to the engine.
    fn run_statement(&mut self, sql: &str, params: &[Value]) -> MapperResult<Self::Rows>;

    /// Finalize pending writes. A no-op when nothing is pending.
    fn commit(&mut self) -> MapperResult<()>;

    /// Rewrite `template` for this executor's dialect without running it.
    fn prepare(&self, template: &QueryTemplate, args: &[Arg]) -> MapperResult<RewriteResult> {
        rewrite(template, args, self.dialect())
    }

    /// Rewrite and run `template`, returning its raw rows.
    fn execute<T>(&mut self, template: T, args: &[Arg]) -> MapperResult<Self::Rows>
    where
        T: Into<QueryTemplate>,
    {
        let prepared = self.prepare(&template.into(), args)?;
        self.config()
            .logger
            .statement(&prepared.query, prepared.arguments.len());
        self.run_statement(&prepared.query, &prepared.arguments)
    }

    /// Like [`execute`](Executor::execute), mapping every row into a record of `schema`.
    fn execute_as<T>(
        &mut self,
        template: T,
        args: &[Arg],
        schema: &Arc<RecordSchema>,
    ) -> MapperResult<Records<Self::Rows>>
    where
        T: Into<QueryTemplate>,
    {
        let rows = self.execute(template, args)?;
        Ok(Records::new(rows, Arc::clone(schema)))
    }

    /// Run the same template once per argument list, in order.
    ///
    /// Stops at the first failure; statements already run stay run.
    fn execute_many<T, A>(&mut self, template: T, arg_lists: &[A]) -> MapperResult<Vec<Self::Rows>>
    where
        T: Into<QueryTemplate>,
        A: AsRef<[Arg]>,
    {
        let template = template.into();
        let mut results = Vec::with_capacity(arg_lists.len());
        for args in arg_lists {
            let prepared = self.prepare(&template, args.as_ref())?;
            self.config()
                .logger
                .statement(&prepared.query, prepared.arguments.len());
            results.push(self.run_statement(&prepared.query, &prepared.arguments)?);
        }
        Ok(results)
    }

    /// [`execute_many`](Executor::execute_many) with every row mapped into a record of `schema`.
    fn execute_many_as<T, A>(
        &mut self,
        template: T,
        arg_lists: &[A],
        schema: &Arc<RecordSchema>,
    ) -> MapperResult<Vec<Records<Self::Rows>>>
    where
        T: Into<QueryTemplate>,
        A: AsRef<[Arg]>,
    {
        let results = self.execute_many(template, arg_lists)?;
        Ok(results
            .into_iter()
            .map(|rows| Records::new(rows, Arc::clone(schema)))
            .collect())
    }

    /// Create the table of every schema, then commit.
    ///
    /// All DDL is rendered first, so a schema without a table name fails the
    /// call before any statement runs.
    fn create_tables<I, S>(&mut self, schemas: I) -> MapperResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<RecordSchema>,
    {
        let ddls = render_table_ddls(schemas)?;
        tracing::debug!(target: "sqlmapper", tables = ddls.len(), "creating tables");
        for ddl in &ddls {
            self.config().logger.statement(ddl, 0);
            for row in self.run_statement(ddl, &[])? {
                row?;
            }
        }
        self.commit()
    }
}

/// Rows mapped into records of one schema, produced lazily.
///
/// Each row's values are fed positionally into
/// [`RecordSchema::from_ordered`]; a row wider than the schema yields
/// [`MapperError::TooManyOrderedFields`](crate::MapperError::TooManyOrderedFields).
#[must_use]
pub struct Records<I> {
    rows: I,
    schema: Arc<RecordSchema>,
}

impl<I> Records<I> {
    pub fn new(rows: I, schema: Arc<RecordSchema>) -> Self {
        Self { rows, schema }
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }
}

impl<I> Iterator for Records<I>
where
    I: Iterator<Item = MapperResult<Row>>,
{
    type Item = MapperResult<RecordInstance>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(row.and_then(|values| self.schema.from_ordered(values)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}
