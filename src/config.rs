use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// Where and how to connect. Handed to [`crate::driver::DriverService::connect`] as-is.
#[derive(Clone, Deserialize)]
pub struct ConnectOptions {
    pub target: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Seconds to wait while establishing the connection; 0 leaves the driver default.
    #[serde(default)]
    pub login_timeout_secs: u64,
}

impl ConnectOptions {
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            user: None,
            password: None,
            login_timeout_secs: 0,
        }
    }

    #[must_use]
    pub fn builder(target: impl Into<String>) -> ConnectOptionsBuilder {
        ConnectOptionsBuilder::new(target)
    }

    #[must_use]
    pub fn login_timeout(&self) -> Option<Duration> {
        (self.login_timeout_secs > 0).then(|| Duration::from_secs(self.login_timeout_secs))
    }
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("target", &self.target)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("login_timeout_secs", &self.login_timeout_secs)
            .finish()
    }
}

/// Fluent builder for [`ConnectOptions`].
#[derive(Debug, Clone)]
pub struct ConnectOptionsBuilder {
    opts: ConnectOptions,
}

impl ConnectOptionsBuilder {
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            opts: ConnectOptions::new(target),
        }
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.opts.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.opts.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn login_timeout_secs(mut self, secs: u64) -> Self {
        self.opts.login_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn finish(self) -> ConnectOptions {
        self.opts
    }
}

/// How `execute` decides between the update and the query path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementClassification {
    /// Ask the prepared statement whether it yields rows; fall back to `Lexical` when the
    /// driver cannot say.
    #[default]
    DriverReported,
    /// A statement is a query when its trimmed, lowercased text starts with `select`.
    Lexical,
}

/// Per-cursor settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CursorOptions {
    /// Default row count for `fetchmany`.
    #[serde(default = "default_arraysize")]
    pub arraysize: usize,
    #[serde(default)]
    pub classification: StatementClassification,
}

fn default_arraysize() -> usize {
    1
}

impl Default for CursorOptions {
    fn default() -> Self {
        Self {
            arraysize: default_arraysize(),
            classification: StatementClassification::default(),
        }
    }
}

impl CursorOptions {
    #[must_use]
    pub fn with_arraysize(mut self, arraysize: usize) -> Self {
        self.arraysize = arraysize;
        self
    }

    #[must_use]
    pub fn with_classification(mut self, classification: StatementClassification) -> Self {
        self.classification = classification;
        self
    }
}
