//! Batch driver.
//!
//! Reads the input one line at a time and hands each line to a
//! [`LineHandler`]. The handler decides, per line, whether the run continues
//! or aborts; that choice is what separates the two batch modes:
//!
//! - [`LedgerPipeline`] decodes, validates and processes ledger records,
//!   routing failures to a reject stream and carrying on.
//! - [`CopyJob`] re-encodes copy records with an injected default value and
//!   aborts on the first I/O failure.
//!
//! Each ledger line moves through [`RecordState`]:
//!
//! ```text
//! Raw -> Parsed -> Validated -> Processed -> written to the valid stream
//!    \-> ParseFailed   \-> ValidationFailed -> written to the reject stream
//! ```

use crate::config::{CopyConfig, FailurePolicy, LedgerConfig, LedgerOptions};
use crate::error::{BatchError, ParseError, Result};
use crate::format::{format_copy, format_output, format_reject, group_thousands};
use crate::processor::process;
use crate::record::{CopyRecord, InputRecord, OutputRecord, RejectRecord};
use crate::summary::SummaryRecord;
use crate::validate::{validate, ValidationError};
use chrono::{Local, NaiveDate};
use log::{debug, error, info, warn};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Where a single ledger line is in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordState<'a> {
    Raw(&'a str),
    Parsed(&'a str, InputRecord),
    ParseFailed(&'a str, ParseError),
    Validated(InputRecord),
    ValidationFailed(&'a str, InputRecord, ValidationError),
    Processed(OutputRecord),
}

impl<'a> RecordState<'a> {
    /// Moves one step forward. Settled states are returned unchanged.
    pub fn advance(self, options: &LedgerOptions) -> Self {
        match self {
            RecordState::Raw(line) => match InputRecord::decode(line) {
                Ok(record) => RecordState::Parsed(line, record),
                Err(e) => RecordState::ParseFailed(line, e),
            },
            RecordState::Parsed(line, record) => match validate(&record, options.type_policy) {
                Ok(()) => RecordState::Validated(record),
                Err(e) => RecordState::ValidationFailed(line, record, e),
            },
            RecordState::Validated(record) => {
                RecordState::Processed(process(&record, options.withdrawal_mode))
            }
            settled => settled,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RecordState::Raw(_) => "RAW",
            RecordState::Parsed(..) => "PARSED",
            RecordState::ParseFailed(..) => "PARSE_FAILED",
            RecordState::Validated(_) => "VALIDATED",
            RecordState::ValidationFailed(..) => "VALIDATION_FAILED",
            RecordState::Processed(_) => "PROCESSED",
        }
    }
}

/// Which stream a ledger line ends up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Valid(OutputRecord),
    /// `detail` is the human-readable cause; only the reason code is written.
    Reject { record: RejectRecord, detail: String },
}

/// Runs one line through decode, validate and process.
pub fn evaluate(line: &str, options: &LedgerOptions) -> Disposition {
    let mut state = RecordState::Raw(line);
    loop {
        state = match state {
            RecordState::ParseFailed(line, e) => {
                return Disposition::Reject {
                    record: RejectRecord::parse_failure(line),
                    detail: e.to_string(),
                };
            }
            RecordState::ValidationFailed(line, record, e) => {
                return Disposition::Reject {
                    record: RejectRecord::invalid(&record, line),
                    detail: e.to_string(),
                };
            }
            RecordState::Processed(output) => return Disposition::Valid(output),
            pending => {
                let next = pending.advance(options);
                debug!("record state -> {}", next.name());
                next
            }
        };
    }
}

/// Whether the driver keeps reading after a line.
#[derive(Debug)]
pub enum Step {
    Continue,
    Abort(BatchError),
}

/// Per-line behaviour plugged into [`drive`].
pub trait LineHandler {
    /// Handles one input line; `line_no` is 1-based.
    fn handle(&mut self, line_no: usize, line: &str) -> Step;

    /// Records fully handled so far.
    fn processed(&self) -> usize;
}

/// Feeds every line of `reader` to `handler` until input is exhausted or
/// the handler aborts. Returns the number of lines read.
///
/// Lines are decoded lossily so one bad byte sequence becomes a bad record
/// instead of a read failure. A trailing `\n` or `\r\n` is stripped.
pub fn drive<R: BufRead, H: LineHandler>(mut reader: R, handler: &mut H) -> Result<usize> {
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        let read = match reader.read_until(b'\n', &mut buf) {
            Ok(n) => n,
            Err(source) => {
                return Err(aborted(
                    handler.processed(),
                    BatchError::Read {
                        line: line_no + 1,
                        source,
                    },
                ));
            }
        };
        if read == 0 {
            break;
        }
        line_no += 1;

        let line = String::from_utf8_lossy(strip_line_ending(&buf));
        if let Step::Abort(e) = handler.handle(line_no, &line) {
            return Err(aborted(handler.processed(), e));
        }
    }

    Ok(line_no)
}

fn strip_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

fn aborted(processed: usize, source: BatchError) -> BatchError {
    error!("Aborting after {} records: {}", processed, source);
    BatchError::Aborted {
        processed,
        source: Box::new(source),
    }
}

fn write_line<W: Write>(out: &mut W, text: &str, line: usize) -> Result<()> {
    writeln!(out, "{}", text).map_err(|source| BatchError::Write { line, source })
}

/// The ledger mode: valid records to one stream, rejects to another.
pub struct LedgerPipeline<V: Write, J: Write> {
    valid: V,
    reject: J,
    options: LedgerOptions,
    summary: SummaryRecord,
}

impl<V: Write, J: Write> LedgerPipeline<V, J> {
    pub fn new(valid: V, reject: J, options: LedgerOptions, process_date: NaiveDate) -> Self {
        LedgerPipeline {
            valid,
            reject,
            options,
            summary: SummaryRecord::new(process_date),
        }
    }

    /// Flushes both streams and returns the run summary.
    pub fn finish(mut self) -> Result<SummaryRecord> {
        let processed = self.summary.total_records;
        let flushed = self.valid.flush().and_then(|_| self.reject.flush());
        if let Err(source) = flushed {
            return Err(aborted(
                processed,
                BatchError::Write {
                    line: processed,
                    source,
                },
            ));
        }
        Ok(self.summary)
    }

    fn accept(&mut self, line_no: usize, output: OutputRecord) -> Step {
        if let Err(e) = write_line(&mut self.valid, &format_output(&output), line_no) {
            return Step::Abort(e);
        }
        debug!(
            "Line {}: {} {} new balance {}",
            line_no, output.account_number, output.tx_type, output.new_balance
        );
        self.summary.record_valid(output.amount);
        Step::Continue
    }

    fn reject(&mut self, line_no: usize, record: RejectRecord, detail: &str) -> Step {
        warn!(
            "Line {}: rejected {} as {}: {}",
            line_no, record.identifier, record.reason, detail
        );
        if let Err(e) = write_line(&mut self.reject, &format_reject(&record), line_no) {
            return Step::Abort(e);
        }
        self.summary.record_reject();

        match self.options.failure_policy {
            FailurePolicy::SkipAndReport => Step::Continue,
            FailurePolicy::AbortOnFirstError => Step::Abort(BatchError::Rejected {
                line: line_no,
                reason: record.reason,
            }),
        }
    }
}

impl<V: Write, J: Write> LineHandler for LedgerPipeline<V, J> {
    fn handle(&mut self, line_no: usize, line: &str) -> Step {
        match evaluate(line, &self.options) {
            Disposition::Valid(output) => self.accept(line_no, output),
            Disposition::Reject { record, detail } => self.reject(line_no, record, &detail),
        }
    }

    fn processed(&self) -> usize {
        self.summary.total_records
    }
}

/// Runs the ledger mode over already-open streams.
pub fn process_ledger<R: BufRead, V: Write, J: Write>(
    reader: R,
    valid: V,
    reject: J,
    options: LedgerOptions,
    process_date: NaiveDate,
) -> Result<SummaryRecord> {
    let mut pipeline = LedgerPipeline::new(valid, reject, options, process_date);
    drive(reader, &mut pipeline)?;
    pipeline.finish()
}

/// Runs the ledger mode over files.
///
/// The input and both outputs are opened before any record is read; failing
/// to open any of them processes nothing and leaves existing output files
/// untouched.
pub fn run_ledger(config: &LedgerConfig) -> Result<SummaryRecord> {
    let input = open_input(&config.input)?;
    let valid = open_output(&config.valid_output)?;
    let reject = open_output(&config.reject_output)?;
    truncate_output(&valid, &config.valid_output)?;
    truncate_output(&reject, &config.reject_output)?;

    info!(
        "Ledger run: {} -> {}, {}",
        config.input.display(),
        config.valid_output.display(),
        config.reject_output.display()
    );

    let date = config
        .process_date
        .unwrap_or_else(|| Local::now().date_naive());
    let summary = process_ledger(
        BufReader::new(input),
        BufWriter::new(valid),
        BufWriter::new(reject),
        config.options,
        date,
    )?;

    info!("{}", summary);
    Ok(summary)
}

/// The copy counter mirrors a 5-digit legacy field.
pub const COPY_COUNT_LIMIT: usize = 99_999;

/// Result of a completed copy run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyReport {
    pub records_written: usize,
}

impl fmt::Display for CopyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Records processed: {}", group_thousands(self.records_written))
    }
}

/// The copy mode: every line is re-encoded; any failure aborts.
pub struct CopyJob<W: Write> {
    output: W,
    default_value: String,
    written: usize,
}

impl<W: Write> CopyJob<W> {
    pub fn new(output: W, default_value: impl Into<String>) -> Self {
        CopyJob {
            output,
            default_value: default_value.into(),
            written: 0,
        }
    }

    pub fn finish(mut self) -> Result<CopyReport> {
        if let Err(source) = self.output.flush() {
            return Err(aborted(
                self.written,
                BatchError::Write {
                    line: self.written,
                    source,
                },
            ));
        }
        Ok(CopyReport {
            records_written: self.written,
        })
    }
}

impl<W: Write> LineHandler for CopyJob<W> {
    fn handle(&mut self, line_no: usize, line: &str) -> Step {
        if self.written >= COPY_COUNT_LIMIT {
            return Step::Abort(BatchError::CountOverflow {
                limit: COPY_COUNT_LIMIT,
            });
        }

        let record = CopyRecord::decode(line).inject(&self.default_value);
        if let Err(e) = write_line(&mut self.output, &format_copy(&record), line_no) {
            return Step::Abort(e);
        }
        self.written += 1;
        debug!("Line {}: copied {}", line_no, record.first);
        Step::Continue
    }

    fn processed(&self) -> usize {
        self.written
    }
}

/// Runs the copy mode over already-open streams.
pub fn process_copy<R: BufRead, W: Write>(
    reader: R,
    output: W,
    default_value: &str,
) -> Result<CopyReport> {
    let mut job = CopyJob::new(output, default_value);
    drive(reader, &mut job)?;
    job.finish()
}

/// Runs the copy mode over files.
pub fn run_copy(config: &CopyConfig) -> Result<CopyReport> {
    let input = open_input(&config.input)?;
    let output = open_output(&config.output)?;
    truncate_output(&output, &config.output)?;

    info!(
        "Copy run: {} -> {}",
        config.input.display(),
        config.output.display()
    );

    let report = process_copy(
        BufReader::new(input),
        BufWriter::new(output),
        &config.default_value,
    )?;

    info!("{}", report);
    Ok(report)
}

/// Which batch mode to run.
#[derive(Debug, Clone)]
pub enum Mode {
    Ledger(LedgerConfig),
    Copy(CopyConfig),
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    Ledger(SummaryRecord),
    Copy(CopyReport),
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunReport::Ledger(summary) => fmt::Display::fmt(summary, f),
            RunReport::Copy(report) => fmt::Display::fmt(report, f),
        }
    }
}

/// Runs whichever mode was selected.
pub fn run(mode: &Mode) -> Result<RunReport> {
    match mode {
        Mode::Ledger(config) => run_ledger(config).map(RunReport::Ledger),
        Mode::Copy(config) => run_copy(config).map(RunReport::Copy),
    }
}

fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| BatchError::OpenInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Opens an output for writing without discarding its contents.
fn open_output(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|source| BatchError::CreateOutput {
            path: path.to_path_buf(),
            source,
        })
}

fn truncate_output(file: &File, path: &Path) -> Result<()> {
    file.set_len(0).map_err(|source| BatchError::CreateOutput {
        path: path.to_path_buf(),
        source,
    })
}
