//! The executor contract: where rewritten queries meet a database engine.
//!
//! Two shapes are provided:
//!
//! - [`Executor`]: every operation completes before returning.
//! - [`AsyncExecutor`]: operations suspend only while a statement is handed
//!   to the engine, and between the items of `execute_many`.
//!
//! Both rewrite through the same [`rewrite`](crate::rewrite()) call, so identical
//! inputs produce byte-identical statements and arguments in either shape.
//! Implementors supply the engine hook (`run_statement`) and `commit`;
//! rewriting, record mapping, `execute_many` and `create_tables` come for free.
//!
//! An executor owns its connection exclusively and does no internal locking.

mod blocking;
mod config;
mod nonblocking;
mod recording;

#[cfg(test)]
mod tests;

pub use blocking::{Executor, Records};
pub use config::ExecutorConfig;
pub use nonblocking::{AsyncExecutor, RecordStream, RowStream};
pub use recording::{RecordedStatement, RecordingExecutor};

use crate::error::MapperResult;
use crate::model::RecordSchema;

/// Render the DDL of every schema, failing before anything runs if one of
/// them has no table name.
pub(crate) fn render_table_ddls<I, S>(schemas: I) -> MapperResult<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<RecordSchema>,
{
    schemas
        .into_iter()
        .map(|schema| schema.as_ref().table_ddl())
        .collect()
}
