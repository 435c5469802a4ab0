//! # sqlmapper
//!
//! SQL query templates that accept composite records as arguments.
//!
//! Write a template with a generic `?` placeholder and pass a mixed list of
//! scalars and records. Before execution the template is rewritten for the
//! target dialect: every scalar gets one parameter mark, and every record
//! expands into `<table>(<fields>)VALUES(<marks>)` with its field values
//! flattened into the argument list.
//!
//! ## Features
//!
//! - **Explicit schemas**: records are declared with a builder, no reflection
//! - **Literal escapes**: [`raw`] text is never scanned for placeholders
//! - **Pure rewriting**: [`rewrite`] has no I/O and no shared state
//! - **Two executor shapes**: blocking [`Executor`] and suspend-capable [`AsyncExecutor`]
//! - **PostgreSQL**: [`PgExecutor`] over `tokio-postgres`, pooled with `deadpool-postgres`
//!
//! ## Example
//!
//! ```ignore
//! use sqlmapper::prelude::*;
//!
//! let book = RecordSchema::builder("Book")
//!     .table("books")
//!     .field("id", "INTEGER")
//!     .field("title", "TEXT")
//!     .extra_ddl("PRIMARY KEY (id)")
//!     .build()?;
//!
//! let mut pg = PgExecutor::connect(&url, ExecutorConfig::new()).await?;
//! pg.create_tables([&book]).await?;
//!
//! // INSERT INTO books(id,title)VALUES($1,$2)  with  [1, 'Dune']
//! let dune = book.from_ordered([Value::from(1), Value::from("Dune")])?;
//! pg.execute("INSERT INTO ?", &args![dune]).await?;
//! pg.commit().await?;
//!
//! let books = pg
//!     .execute_as("SELECT * FROM books WHERE title <> ?", &args!["?"], &book)
//!     .await?
//!     .collect_records()
//!     .await?;
//! ```

pub mod error;
pub mod executor;
pub mod logging;
pub mod model;
pub mod pg;
pub mod prelude;
pub mod rewrite;
pub mod template;
pub mod value;

pub use error::{MapperError, MapperResult};
pub use executor::{
    AsyncExecutor, Executor, ExecutorConfig, RecordStream, RecordedStatement, Records,
    RecordingExecutor, RowStream,
};
pub use logging::SqlLogger;
pub use model::{FieldDescriptor, RecordInstance, RecordSchema, SchemaBuilder};
pub use pg::{PgConnection, PgExecutor};
pub use rewrite::{
    Arg, DEFAULT_PLACEHOLDER, Dialect, ParamMark, RewritePolicy, RewriteResult, rewrite,
};
pub use template::{QuerySegment, QueryTemplate, raw};
pub use value::{Row, Value};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config, executor_from_pool};
