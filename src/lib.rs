//! # Fixed-Width Batch
//!
//! A batch processor for legacy fixed-width record files. Two modes share
//! one line-by-line driver:
//!
//! - **Ledger**: decodes account transactions, validates them, applies
//!   deposit interest or withdrawal fees, and writes a 45-character valid
//!   line or an 80-character reject line per input line. Bad records never
//!   stop the run (unless fail-fast is requested).
//! - **Copy**: re-encodes 40-character records with an injected default
//!   field and aborts on the first I/O failure.
//!
//! ## Design Principles
//!
//! - **Exact decimals**: amounts use `rust_decimal`; rounding to cents
//!   (half-up) happens only when a value is rendered
//! - **Pure stages**: decoding, validation, processing and formatting are
//!   plain functions; only the driver does I/O
//! - **Deterministic output**: valid and reject lines keep input order
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use fixed_width_batch::{process_ledger, LedgerOptions};
//! use std::io::Cursor;
//!
//! let input = "ACC000000001DEPOSIT 20240101000010000000000500000\n";
//! let mut valid = Vec::new();
//! let mut reject = Vec::new();
//! let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let summary = process_ledger(
//!     Cursor::new(input),
//!     &mut valid,
//!     &mut reject,
//!     LedgerOptions::default(),
//!     date,
//! )
//! .unwrap();
//!
//! assert_eq!(summary.valid_records, 1);
//! assert_eq!(
//!     String::from_utf8(valid).unwrap(),
//!     "ACC000000001DEPOSIT 0000000051000500000010000\n"
//! );
//! ```

pub mod config;
pub mod decimal;
pub mod engine;
pub mod error;
pub mod format;
pub mod processor;
pub mod record;
pub mod summary;
pub mod validate;

pub use config::{CopyConfig, FailurePolicy, LedgerConfig, LedgerOptions};
pub use decimal::Money;
pub use engine::{
    evaluate, process_copy, process_ledger, run, run_copy, run_ledger, CopyReport, Disposition,
    Mode, RunReport,
};
pub use error::{BatchError, ParseError, Result};
pub use processor::{process, WithdrawalMode};
pub use record::{InputRecord, OutputRecord, RejectReason, RejectRecord, TxType};
pub use summary::SummaryRecord;
pub use validate::{validate, TypePolicy, ValidationError};
