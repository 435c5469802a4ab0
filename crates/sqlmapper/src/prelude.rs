//! Convenient imports for typical `sqlmapper` usage.
//!
//! ```ignore
//! use sqlmapper::prelude::*;
//! ```

pub use crate::{
    Arg, AsyncExecutor, Dialect, Executor, ExecutorConfig, MapperError, MapperResult,
    PgExecutor, QueryTemplate, RecordInstance, RecordSchema, Value, args, raw, rewrite,
};

#[cfg(feature = "pool")]
pub use crate::{create_pool, executor_from_pool};
