//! Error types for sqlmapper

use thiserror::Error;

/// Result type alias for sqlmapper operations
pub type MapperResult<T> = Result<T, MapperError>;

/// Errors raised while building records, rewriting templates, or executing them.
///
/// The record and rewrite kinds are caller-input errors: they are raised at the
/// exact point of violation and never retried. The remaining kinds come from the
/// executor side and carry the underlying failure through unmodified.
#[derive(Debug, Error)]
pub enum MapperError {
    /// More positional values than declared fields
    #[error("model '{model_name}' has {actual} fields, but {given} ordered fields was given")]
    TooManyOrderedFields {
        model_name: String,
        given: usize,
        actual: usize,
    },

    /// A named value collides with a positional one
    #[error("field '{0}' was already filled! Check your ordered fields, it may help")]
    FieldAlreadyTaken(String),

    /// A named value for a field the model does not declare
    #[error("unknown field '{0}'! (It is not declared in the model)")]
    UnknownField(String),

    /// A field left unset on a model declared with `require_all_fields()`
    #[error("field '{field}' of the model '{model_name}' was not filled")]
    MissingField { model_name: String, field: String },

    /// The same field name declared twice
    #[error("field '{field}' is declared more than once in the model '{model_name}'")]
    DuplicateField { model_name: String, field: String },

    /// DDL requested for a model without a table name
    #[error(
        "tablename not specified for the model '{0}'! You cannot create an unnamed table!"
    )]
    TablenameNotSpecifiedOnTableCreation(String),

    /// A record argument rewritten for a model without a table name
    #[error(
        "tablename not specified for the model '{0}'! SQL mapper doesn't know what tablename to use in query parameter mark substitution, so add the tablename to the model!"
    )]
    TablenameNotSpecifiedOnInsertion(String),

    /// The template has more placeholder marks than arguments were given
    #[error("placeholder #{placeholders_seen} has no argument ({given} arguments given)")]
    NotEnoughArguments { placeholders_seen: usize, given: usize },

    /// Arguments left over after every placeholder was consumed (strict policy only)
    #[error("only {used} of {given} arguments were consumed by placeholders")]
    UnconsumedArguments { used: usize, given: usize },

    /// The placeholder recognition pattern failed to compile
    #[error("invalid placeholder pattern: {0}")]
    InvalidPlaceholder(#[from] regex::Error),

    /// Connection or statement error, passed through from the engine
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Column decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl MapperError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised while constructing a record instance.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            Self::TooManyOrderedFields { .. }
                | Self::FieldAlreadyTaken(_)
                | Self::UnknownField(_)
                | Self::MissingField { .. }
        )
    }

    /// Whether this error was raised by the rewriter.
    pub fn is_rewrite_error(&self) -> bool {
        matches!(
            self,
            Self::TablenameNotSpecifiedOnInsertion(_)
                | Self::NotEnoughArguments { .. }
                | Self::UnconsumedArguments { .. }
        )
    }

    /// Whether this error came from the database engine.
    pub fn is_engine_error(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for MapperError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
