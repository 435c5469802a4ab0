//! Template rewriting.
//!
//! [`rewrite`] walks a [`QueryTemplate`] and replaces every placeholder found in
//! its substitutable segments with the next argument:
//!
//! - a scalar becomes one dialect mark and one flattened value;
//! - a record becomes `<table>(<f1>,<f2>,...)VALUES(<mark>,<mark>,...)` and
//!   contributes each field value in declaration order.
//!
//! ```ignore
//! use sqlmapper::{Dialect, args, rewrite};
//!
//! let out = rewrite(&"INSERT INTO ?".into(), &args![book], &Dialect::question())?;
//! assert_eq!(out.query, "INSERT INTO books(id,title)VALUES(?,?)");
//! ```
//!
//! Rewriting is pure and all-or-nothing: an error leaves nothing half-built.

mod arg;
mod dialect;


pub use arg::Arg;
pub use dialect::{DEFAULT_PLACEHOLDER, Dialect, ParamMark, RewritePolicy};

use crate::error::{MapperError, MapperResult};
use crate::model::RecordInstance;
use crate::template::{QuerySegment, QueryTemplate};
use crate::value::Value;

/// Final query text plus the flattened argument list, ready for an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RewriteResult {
    pub query: String,
    pub arguments: Vec<Value>,
}

impl RewriteResult {
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.query, self.arguments)
    }
}

/// Rewrite `template` against `args` for `dialect`.
///
/// Segments are emitted in order. Literal segments pass through untouched.
/// In substitutable segments each match of the dialect's placeholder pattern
/// consumes the next argument; the cursor runs across segment boundaries.
///
/// # Errors
///
/// - [`MapperError::TablenameNotSpecifiedOnInsertion`] for a record whose schema
///   has no table name;
/// - [`MapperError::NotEnoughArguments`] when a placeholder has no argument left;
/// - [`MapperError::UnconsumedArguments`] when arguments remain under
///   [`RewritePolicy::Strict`].
pub fn rewrite(
    template: &QueryTemplate,
    args: &[Arg],
    dialect: &Dialect,
) -> MapperResult<RewriteResult> {
    let capacity = template.segments().iter().map(|s| s.text().len()).sum();
    let mut query = String::with_capacity(capacity);
    let mut arguments = Vec::with_capacity(args.iter().map(Arg::width).sum());
    let mut pending = args.iter();
    let mut used = 0;

    for segment in template.segments() {
        let text = match segment {
            QuerySegment::Literal(text) => {
                query.push_str(text);
                continue;
            }
            QuerySegment::Substitutable(text) => text,
        };

        let mut tail = 0;
        for found in dialect.placeholder().find_iter(text) {
            query.push_str(&text[tail..found.start()]);
            tail = found.end();

            let arg = pending.next().ok_or(MapperError::NotEnoughArguments {
                placeholders_seen: used + 1,
                given: args.len(),
            })?;
            used += 1;

            match arg {
                Arg::Scalar(value) => {
                    arguments.push(value.clone());
                    dialect.mark().write(&mut query, arguments.len());
                }
                Arg::Record(record) => {
                    expand_record(record, dialect, &mut query, &mut arguments)?;
                }
            }
        }
        query.push_str(&text[tail..]);
    }

    if dialect.policy() == RewritePolicy::Strict && used < args.len() {
        return Err(MapperError::UnconsumedArguments {
            used,
            given: args.len(),
        });
    }

    Ok(RewriteResult { query, arguments })
}

fn expand_record(
    record: &RecordInstance,
    dialect: &Dialect,
    query: &mut String,
    arguments: &mut Vec<Value>,
) -> MapperResult<()> {
    let schema = record.schema();
    let table = schema.table_name().ok_or_else(|| {
        MapperError::TablenameNotSpecifiedOnInsertion(schema.model_name().to_string())
    })?;

    query.push_str(table);
    query.push('(');
    for (i, name) in schema.field_names().enumerate() {
        if i > 0 {
            query.push(',');
        }
        query.push_str(name);
    }
    query.push_str(")VALUES(");
    for (i, value) in record.values().iter().enumerate() {
        if i > 0 {
            query.push(',');
        }
        arguments.push(value.clone());
        dialect.mark().write(query, arguments.len());
    }
    query.push(')');
    Ok(())
}
