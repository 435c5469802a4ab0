use crate::logging::SqlLogger;
use crate::rewrite::{Dialect, RewritePolicy};

/// Configuration shared by the executors.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Leftover-argument policy applied to every rewrite. `None` keeps the
    /// policy of the dialect the executor was built with.
    pub policy: Option<RewritePolicy>,
    /// Open a transaction before the first statement after a commit, so that
    /// `commit()` has writes to finalize. When disabled every statement is
    /// committed by the engine on its own and `commit()` is a no-op.
    pub implicit_transactions: bool,
    /// Statement logging.
    pub logger: SqlLogger,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            policy: None,
            implicit_transactions: true,
            logger: SqlLogger::default(),
        }
    }
}

impl ExecutorConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the leftover-argument policy of the executor's dialect.
    pub fn policy(mut self, policy: RewritePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Fail rewrites that leave arguments unconsumed.
    pub fn strict(self) -> Self {
        self.policy(RewritePolicy::Strict)
    }

    /// Enable or disable implicit transactions.
    pub fn implicit_transactions(mut self, enabled: bool) -> Self {
        self.implicit_transactions = enabled;
        self
    }

    /// Let the engine commit every statement on its own.
    pub fn autocommit(self) -> Self {
        self.implicit_transactions(false)
    }

    /// Replace the statement logger.
    pub fn logger(mut self, logger: SqlLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Disable statement logging.
    pub fn no_logging(self) -> Self {
        self.logger(SqlLogger::disabled())
    }

    /// Apply this configuration's policy override, if any, to an executor's
    /// base dialect.
    pub fn dialect(&self, base: Dialect) -> Dialect {
        match self.policy {
            Some(policy) => base.with_policy(policy),
            None => base,
        }
    }
}
