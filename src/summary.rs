//! Per-run totals.

use crate::decimal::Money;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Counts and totals accumulated over one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRecord {
    pub total_records: usize,
    pub valid_records: usize,
    pub reject_records: usize,
    /// Sum of the amounts of all accepted records.
    pub total_amount: Money,
    pub process_time: NaiveDate,
}

impl SummaryRecord {
    pub fn new(process_time: NaiveDate) -> Self {
        SummaryRecord {
            total_records: 0,
            valid_records: 0,
            reject_records: 0,
            total_amount: Money::ZERO,
            process_time,
        }
    }

    pub fn record_valid(&mut self, amount: Money) {
        self.total_records += 1;
        self.valid_records += 1;
        self.total_amount += amount;
    }

    pub fn record_reject(&mut self) {
        self.total_records += 1;
        self.reject_records += 1;
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for SummaryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SUMMARY: Total={}, Valid={}, Rejected={}, TotalAmount={}, Time={}",
            self.total_records,
            self.valid_records,
            self.reject_records,
            self.total_amount,
            self.process_time.format("%Y-%m-%d"),
        )
    }
}
