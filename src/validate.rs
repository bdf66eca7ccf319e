//! Domain validation of decoded input records.

use crate::record::{InputRecord, RejectReason};
use thiserror::Error;

/// How transaction types outside {DEPOSIT, WITHDRAW} are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypePolicy {
    /// Reject unknown types.
    #[default]
    Strict,
    /// Accept unknown types; the processor applies no interest or fee.
    PassThrough,
}

/// Why a decoded record was not accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("unknown transaction type {0:?}")]
    UnknownTransactionType(String),
}

impl ValidationError {
    /// Every validation failure is reported under a single reject code.
    pub fn reason(&self) -> RejectReason {
        RejectReason::InvalidRecord
    }
}

/// Checks a record against the domain rules.
pub fn validate(record: &InputRecord, policy: TypePolicy) -> Result<(), ValidationError> {
    if !record.amount.is_positive() {
        return Err(ValidationError::NonPositiveAmount);
    }
    if policy == TypePolicy::Strict && !record.tx_type.is_known() {
        return Err(ValidationError::UnknownTransactionType(
            record.tx_type.to_string(),
        ));
    }
    Ok(())
}
