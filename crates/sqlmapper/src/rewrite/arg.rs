use crate::model::RecordInstance;
use crate::value::Value;

/// An argument handed to the rewriter alongside a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Receives one dialect mark and contributes one value.
    Scalar(Value),
    /// Expands into `<table>(<fields>)VALUES(<marks>)` and contributes every
    /// field value in declaration order.
    Record(RecordInstance),
}

impl Arg {
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Number of values this argument contributes to the flattened list.
    pub fn width(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Record(rec) => rec.values().len(),
        }
    }
}

impl<T: Into<Value>> From<T> for Arg {
    fn from(value: T) -> Self {
        Arg::Scalar(value.into())
    }
}

impl From<RecordInstance> for Arg {
    fn from(record: RecordInstance) -> Self {
        Arg::Record(record)
    }
}

impl From<&RecordInstance> for Arg {
    fn from(record: &RecordInstance) -> Self {
        Arg::Record(record.clone())
    }
}

/// Build a `Vec<Arg>` from scalars and records.
///
/// ```ignore
/// let args = sqlmapper::args![book, 42, "title"];
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}
