//! Transaction processor: interest accrual and fee deduction.
//!
//! Pure functions over validated records. No rounding happens here; the
//! output formatter rounds once, half-up, to cents.

use crate::decimal::Money;
use crate::record::{InputRecord, OutputRecord, TxType};
use rust_decimal::Decimal;

/// Interest credited on every deposit (0.05%).
pub const DEPOSIT_INTEREST_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 4);

/// Fee charged on every withdrawal (2.5%).
pub const WITHDRAWAL_FEE_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 3);

/// Balance arithmetic applied to withdrawals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WithdrawalMode {
    /// `balance + amount - fee`, matching files produced by the legacy job.
    #[default]
    Legacy,
    /// `balance - amount - fee`.
    Debit,
}

/// Computes the new balance for a validated record.
///
/// Unknown types pass through with no interest or fee.
pub fn process(record: &InputRecord, mode: WithdrawalMode) -> OutputRecord {
    let amount = record.amount;
    let balance = record.current_balance;

    let new_balance = match &record.tx_type {
        TxType::Deposit => balance + amount + interest(amount),
        TxType::Withdraw => match mode {
            WithdrawalMode::Legacy => balance + amount - fee(amount),
            WithdrawalMode::Debit => balance - amount - fee(amount),
        },
        TxType::Other(_) => balance + amount,
    };

    OutputRecord {
        account_number: record.account_number.clone(),
        tx_type: record.tx_type.clone(),
        new_balance,
        amount,
    }
}

/// Interest earned by a deposit, unrounded.
pub fn interest(amount: Money) -> Money {
    amount.times(DEPOSIT_INTEREST_RATE)
}

/// Fee owed on a withdrawal, unrounded.
pub fn fee(amount: Money) -> Money {
    amount.times(WITHDRAWAL_FEE_RATE)
}
