//! Run configuration for both batch modes.

use crate::processor::WithdrawalMode;
use crate::validate::TypePolicy;
use chrono::NaiveDate;
use std::path::PathBuf;

/// What the driver does when a record is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Write a reject line and continue with the next record.
    #[default]
    SkipAndReport,
    /// Write the reject line, then abort the run.
    AbortOnFirstError,
}

/// Options that shape how each ledger record is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerOptions {
    pub withdrawal_mode: WithdrawalMode,
    pub type_policy: TypePolicy,
    pub failure_policy: FailurePolicy,
}

/// A ledger run: one input, a valid output and a reject output.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub input: PathBuf,
    pub valid_output: PathBuf,
    pub reject_output: PathBuf,
    pub options: LedgerOptions,
    /// Date stamped on the summary; today when `None`.
    pub process_date: Option<NaiveDate>,
}

impl LedgerConfig {
    pub fn new(
        input: impl Into<PathBuf>,
        valid_output: impl Into<PathBuf>,
        reject_output: impl Into<PathBuf>,
    ) -> Self {
        LedgerConfig {
            input: input.into(),
            valid_output: valid_output.into(),
            reject_output: reject_output.into(),
            options: LedgerOptions::default(),
            process_date: None,
        }
    }

    pub fn with_options(mut self, options: LedgerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_process_date(mut self, date: NaiveDate) -> Self {
        self.process_date = Some(date);
        self
    }
}

/// Value written into the injected field when none is given.
pub const DEFAULT_COPY_VALUE: &str = "Good";

/// A copy-transform run.
#[derive(Debug, Clone)]
pub struct CopyConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub default_value: String,
}

impl CopyConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        CopyConfig {
            input: input.into(),
            output: output.into(),
            default_value: DEFAULT_COPY_VALUE.to_string(),
        }
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }
}
