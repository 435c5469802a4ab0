use super::{Arg, RewriteResult, rewrite};
use crate::error::MapperResult;
use crate::template::QueryTemplate;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Pattern recognised as the generic placeholder when none is configured.
pub const DEFAULT_PLACEHOLDER: &str = r"\?";

static QUESTION_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_PLACEHOLDER).expect("default placeholder pattern"));

/// How the target engine spells a bound parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamMark {
    /// The same text for every parameter, e.g. `?`.
    Fixed(Cow<'static, str>),
    /// A prefix followed by the 1-based position of the value in the
    /// flattened argument list, e.g. `$1`, `$2`.
    Numbered(Cow<'static, str>),
}

impl ParamMark {
    /// Append the mark for the value at `position` (1-based).
    pub fn write(&self, out: &mut String, position: usize) {
        match self {
            Self::Fixed(mark) => out.push_str(mark),
            Self::Numbered(prefix) => {
                out.push_str(prefix);
                out.push_str(&position.to_string());
            }
        }
    }
}

/// What to do with arguments left over once every placeholder is consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RewritePolicy {
    /// Leftover arguments are dropped silently.
    #[default]
    Permissive,
    /// Leftover arguments fail the rewrite with
    /// [`MapperError::UnconsumedArguments`](crate::MapperError::UnconsumedArguments).
    Strict,
}

/// Target dialect for rewriting: the replacement mark, the placeholder pattern
/// recognised in substitutable segments, and the leftover-argument policy.
#[derive(Debug, Clone)]
pub struct Dialect {
    mark: ParamMark,
    placeholder: Regex,
    policy: RewritePolicy,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::question()
    }
}

impl Dialect {
    /// A dialect emitting `mark`, recognising `?` as the placeholder.
    pub fn new(mark: ParamMark) -> Self {
        Self {
            mark,
            placeholder: QUESTION_MARK.clone(),
            policy: RewritePolicy::default(),
        }
    }

    /// `?` marks, as used by SQLite and MySQL drivers.
    pub fn question() -> Self {
        Self::new(ParamMark::Fixed(Cow::Borrowed("?")))
    }

    /// `$1, $2, ...` marks, as used by PostgreSQL.
    pub fn postgres() -> Self {
        Self::new(ParamMark::Numbered(Cow::Borrowed("$")))
    }

    /// Recognise `pattern` (a regular expression) as the generic placeholder.
    pub fn with_placeholder(mut self, pattern: &str) -> MapperResult<Self> {
        self.placeholder = Regex::new(pattern)?;
        Ok(self)
    }

    /// Set the leftover-argument policy.
    pub fn with_policy(mut self, policy: RewritePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Shorthand for `with_policy(RewritePolicy::Strict)`.
    pub fn strict(self) -> Self {
        self.with_policy(RewritePolicy::Strict)
    }

    pub fn mark(&self) -> &ParamMark {
        &self.mark
    }

    pub fn placeholder(&self) -> &Regex {
        &self.placeholder
    }

    pub fn policy(&self) -> RewritePolicy {
        self.policy
    }

    /// Method form of [`rewrite`].
    pub fn rewrite(&self, template: &QueryTemplate, args: &[Arg]) -> MapperResult<RewriteResult> {
        rewrite(template, args, self)
    }
}
