//! Query templates: ordered text segments, some scanned for placeholders and
//! some passed through verbatim.
//!
//! Most callers never build a template explicitly; a plain `&str` converts into
//! a single substitutable segment. Use [`raw`] for text that must not be
//! scanned, e.g. a quoted constant containing a literal `?`:
//!
//! ```ignore
//! use sqlmapper::raw;
//!
//! let q = "INSERT INTO a VALUES (?, " + raw("'?'") + ")";
//! ```

use std::fmt;
use std::ops::{Add, AddAssign};


/// One piece of a [`QueryTemplate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySegment {
    /// Emitted unchanged; never scanned and never consumes arguments.
    Literal(String),
    /// Scanned for placeholder marks during rewriting.
    Substitutable(String),
}

impl QuerySegment {
    pub fn text(&self) -> &str {
        match self {
            Self::Literal(s) | Self::Substitutable(s) => s,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl fmt::Display for QuerySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => write!(f, "Literal({s:?})"),
            Self::Substitutable(s) => write!(f, "Substitutable({s:?})"),
        }
    }
}

/// An ordered sequence of [`QuerySegment`]s.
///
/// Concatenation appends segments and never merges or reclassifies them, so a
/// literal stays literal wherever it ends up.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTemplate {
    segments: Vec<QuerySegment>,
}

/// Build a template holding one literal segment.
pub fn raw(text: impl Into<String>) -> QueryTemplate {
    QueryTemplate::raw(text)
}

impl QueryTemplate {
    /// A template holding one substitutable segment.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            segments: vec![QuerySegment::Substitutable(text.into())],
        }
    }

    /// A template holding one literal segment.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            segments: vec![QuerySegment::Literal(text.into())],
        }
    }

    /// A template with no segments.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[QuerySegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a substitutable segment.
    pub fn push(&mut self, text: impl Into<String>) -> &mut Self {
        self.segments.push(QuerySegment::Substitutable(text.into()));
        self
    }

    /// Append a literal segment.
    pub fn push_raw(&mut self, text: impl Into<String>) -> &mut Self {
        self.segments.push(QuerySegment::Literal(text.into()));
        self
    }

    /// Append another template, consuming it.
    pub fn push_template(&mut self, mut other: QueryTemplate) -> &mut Self {
        self.segments.append(&mut other.segments);
        self
    }

    /// Concatenated text of every segment, without any rewriting.
    pub fn text(&self) -> String {
        self.segments.iter().map(QuerySegment::text).collect()
    }

    fn prepend(mut self, segment: QuerySegment) -> Self {
        self.segments.insert(0, segment);
        self
    }
}

impl fmt::Display for QueryTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{segment}")?;
        }
        f.write_str("]")
    }
}

impl From<&str> for QueryTemplate {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for QueryTemplate {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&QueryTemplate> for QueryTemplate {
    fn from(template: &QueryTemplate) -> Self {
        template.clone()
    }
}

impl Add<&str> for QueryTemplate {
    type Output = QueryTemplate;

    fn add(mut self, rhs: &str) -> QueryTemplate {
        self.push(rhs);
        self
    }
}

impl Add<String> for QueryTemplate {
    type Output = QueryTemplate;

    fn add(mut self, rhs: String) -> QueryTemplate {
        self.push(rhs);
        self
    }
}

impl Add<QueryTemplate> for QueryTemplate {
    type Output = QueryTemplate;

    fn add(mut self, rhs: QueryTemplate) -> QueryTemplate {
        self.push_template(rhs);
        self
    }
}

impl Add<QueryTemplate> for &str {
    type Output = QueryTemplate;

    fn add(self, rhs: QueryTemplate) -> QueryTemplate {
        rhs.prepend(QuerySegment::Substitutable(self.to_string()))
    }
}

impl Add<QueryTemplate> for String {
    type Output = QueryTemplate;

    fn add(self, rhs: QueryTemplate) -> QueryTemplate {
        rhs.prepend(QuerySegment::Substitutable(self))
    }
}

impl AddAssign<&str> for QueryTemplate {
    fn add_assign(&mut self, rhs: &str) {
        self.push(rhs);
    }
}

impl AddAssign<QueryTemplate> for QueryTemplate {
    fn add_assign(&mut self, rhs: QueryTemplate) {
        self.push_template(rhs);
    }
}
