//! Record schemas and record instances.
//!
//! A [`RecordSchema`] is declared once, explicitly, through [`SchemaBuilder`]:
//! ordered field names with their column type markers, an optional table name,
//! and an optional extra DDL clause. Instances are built against a shared
//! `Arc<RecordSchema>` from positional and/or named values.
//!
//! # Example
//!
//! ```ignore
//! use sqlmapper::RecordSchema;
//!
//! let book = RecordSchema::builder("Book")
//!     .table("books")
//!     .field("id", "INTEGER")
//!     .field("title", "TEXT")
//!     .extra_ddl("PRIMARY KEY (id)")
//!     .build()?;
//!
//! let b = book.from_named([("title", "Dune")])?;
//! assert_eq!(b.values(), &[Value::Null, Value::from("Dune")]);
//! ```

mod instance;
mod schema;


pub use instance::RecordInstance;
pub use schema::{FieldDescriptor, RecordSchema, SchemaBuilder};
