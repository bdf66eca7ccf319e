//! Fixed-width record layouts and the record decoder.
//!
//! Every field occupies a constant range of character positions. Decoding is
//! explicit slicing followed by exact-decimal parsing of numeric fields.

use crate::decimal::Money;
use crate::error::ParseError;
use std::fmt;

/// A fixed range of character positions within a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub start: usize,
    pub width: usize,
}

impl Field {
    const fn new(name: &'static str, start: usize, width: usize) -> Self {
        Field { name, start, width }
    }

    /// First position after the field.
    pub const fn end(&self) -> usize {
        self.start + self.width
    }

    /// Extracts the field from a record, clamped to the record's length.
    fn slice(&self, chars: &[char]) -> String {
        let start = self.start.min(chars.len());
        let end = self.end().min(chars.len());
        chars[start..end].iter().collect()
    }
}

/// Input ledger record layout.
pub mod input_layout {
    use super::Field;

    pub const ACCOUNT: Field = Field::new("account", 0, 12);
    pub const TX_TYPE: Field = Field::new("type", 12, 8);
    pub const DATE: Field = Field::new("date", 20, 8);
    pub const AMOUNT: Field = Field::new("amount", 28, 9);
    pub const BALANCE: Field = Field::new("balance", 37, 12);

    /// Shortest line the decoder accepts.
    pub const MIN_LEN: usize = 35;
}

/// Output ledger record layout.
pub mod output_layout {
    use super::Field;

    pub const ACCOUNT: Field = Field::new("account", 0, 12);
    pub const TX_TYPE: Field = Field::new("type", 12, 8);
    pub const NEW_BALANCE: Field = Field::new("new balance", 20, 14);
    pub const AMOUNT: Field = Field::new("amount", 34, 11);

    pub const WIDTH: usize = 45;
}

/// Reject record width.
pub const REJECT_WIDTH: usize = 80;

/// Copy-transform record layout (both input and output are 40 wide).
pub mod copy_layout {
    use super::Field;

    pub const IN_FIRST: Field = Field::new("field 1", 0, 10);
    pub const IN_SECOND: Field = Field::new("field 2", 30, 10);

    pub const OUT_FIRST: Field = Field::new("field 1", 0, 10);
    pub const OUT_INJECTED: Field = Field::new("field 3", 10, 20);
    pub const OUT_SECOND: Field = Field::new("field 2", 30, 10);

    pub const WIDTH: usize = 40;
}

/// Transaction category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TxType {
    Deposit,
    Withdraw,
    /// Anything else, kept verbatim (trimmed).
    Other(String),
}

impl TxType {
    /// Maps a trimmed type field to a category. Matching is case-sensitive.
    pub fn parse(s: &str) -> Self {
        match s {
            "DEPOSIT" => TxType::Deposit,
            "WITHDRAW" => TxType::Withdraw,
            other => TxType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TxType::Deposit => "DEPOSIT",
            TxType::Withdraw => "WITHDRAW",
            TxType::Other(s) => s,
        }
    }

    /// Returns `true` for DEPOSIT and WITHDRAW.
    pub fn is_known(&self) -> bool {
        !matches!(self, TxType::Other(_))
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub account_number: String,
    pub tx_type: TxType,
    /// `YYYYMMDD`, carried through unparsed.
    pub transaction_date: String,
    pub amount: Money,
    pub current_balance: Money,
}

impl InputRecord {
    /// Decodes one line of input.
    ///
    /// Lines under 35 characters are too short to hold a record at all; a
    /// line that ends inside the amount or balance field is rejected as
    /// well. Trailing content after the last field is ignored.
    pub fn decode(line: &str) -> Result<Self, ParseError> {
        use input_layout::*;

        let chars: Vec<char> = line.chars().collect();
        if chars.len() < MIN_LEN {
            return Err(ParseError::TooShort {
                len: chars.len(),
                min: MIN_LEN,
            });
        }

        Ok(InputRecord {
            account_number: ACCOUNT.slice(&chars).trim().to_string(),
            tx_type: TxType::parse(TX_TYPE.slice(&chars).trim()),
            transaction_date: DATE.slice(&chars).trim().to_string(),
            amount: numeric(&AMOUNT, &chars)?,
            current_balance: numeric(&BALANCE, &chars)?,
        })
    }
}

/// Numeric fields must be present in full; a partial field is never read
/// as a shorter number.
fn numeric(field: &Field, chars: &[char]) -> Result<Money, ParseError> {
    if chars.len() < field.end() {
        return Err(ParseError::FieldTruncated {
            field: field.name,
            end: field.end(),
            len: chars.len(),
        });
    }
    let raw = field.slice(chars);
    Money::from_implied(&raw).ok_or(ParseError::InvalidNumeric {
        field: field.name,
        value: raw,
    })
}

/// A processed record ready for the valid stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub account_number: String,
    pub tx_type: TxType,
    /// Exact, unrounded; rounded only when formatted.
    pub new_balance: Money,
    pub amount: Money,
}

impl OutputRecord {
    /// Reads back a line produced by [`crate::format::format_output`].
    pub fn decode(line: &str) -> Result<Self, ParseError> {
        use output_layout::*;

        let chars: Vec<char> = line.chars().collect();
        if chars.len() < WIDTH {
            return Err(ParseError::TooShort {
                len: chars.len(),
                min: WIDTH,
            });
        }

        Ok(OutputRecord {
            account_number: ACCOUNT.slice(&chars).trim().to_string(),
            tx_type: TxType::parse(TX_TYPE.slice(&chars).trim()),
            new_balance: numeric(&NEW_BALANCE, &chars)?,
            amount: numeric(&AMOUNT, &chars)?,
        })
    }
}

/// Diagnostic code attached to a reject record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// The line could not be decoded.
    ParseError,
    /// The record decoded but failed validation.
    InvalidRecord,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::ParseError => "PARSE ERROR",
            RejectReason::InvalidRecord => "INVALID RECORD",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Identifier used when the account number could not be decoded.
pub const UNKNOWN_IDENTIFIER: &str = "UNKNOWN";

/// A line routed to the reject stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectRecord {
    pub identifier: String,
    pub reason: RejectReason,
    /// Verbatim input line, when available.
    pub original: Option<String>,
}

impl RejectRecord {
    /// Reject for a line that failed to decode.
    pub fn parse_failure(line: &str) -> Self {
        RejectRecord {
            identifier: UNKNOWN_IDENTIFIER.to_string(),
            reason: RejectReason::ParseError,
            original: Some(line.to_string()),
        }
    }

    /// Reject for a decoded record that failed validation.
    pub fn invalid(record: &InputRecord, line: &str) -> Self {
        RejectRecord {
            identifier: record.account_number.clone(),
            reason: RejectReason::InvalidRecord,
            original: Some(line.to_string()),
        }
    }
}

/// A decoded copy-transform input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRecord {
    pub first: String,
    pub second: String,
}

impl CopyRecord {
    /// Decodes a copy-transform line. Short lines are treated as space padded,
    /// so decoding never fails.
    pub fn decode(line: &str) -> Self {
        use copy_layout::*;

        let chars: Vec<char> = line.chars().collect();
        CopyRecord {
            first: IN_FIRST.slice(&chars).trim().to_string(),
            second: IN_SECOND.slice(&chars).trim().to_string(),
        }
    }

    /// Builds the output record, injecting `value` into the third field.
    pub fn inject(self, value: &str) -> CopyOutputRecord {
        CopyOutputRecord {
            first: self.first,
            second: self.second,
            injected: value.to_string(),
        }
    }
}

/// A copy-transform output record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOutputRecord {
    pub first: String,
    pub second: String,
    pub injected: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPOSIT_LINE: &str = "ACC000000001DEPOSIT 20240101000010000000000500000";

    #[test]
    fn test_decode_deposit() {
        let record = InputRecord::decode(DEPOSIT_LINE).unwrap();
        assert_eq!(record.account_number, "ACC000000001");
        assert_eq!(record.tx_type, TxType::Deposit);
        assert_eq!(record.transaction_date, "20240101");
        assert_eq!(record.amount.to_string(), "100.00");
        assert_eq!(record.current_balance.to_string(), "5000.00");
    }

    #[test]
    fn test_decode_ignores_trailing_content() {
        let line = format!("{}   EXTRA STUFF", DEPOSIT_LINE);
        let record = InputRecord::decode(&line).unwrap();
        assert_eq!(record.current_balance.to_string(), "5000.00");
    }

    #[test]
    fn test_decode_trims_text_fields() {
        let line = "  ACC1      WITHDRAW20240101000000500000000100000";
        let record = InputRecord::decode(line).unwrap();
        assert_eq!(record.account_number, "ACC1");
        assert_eq!(record.tx_type, TxType::Withdraw);
    }

    #[test]
    fn test_decode_too_short() {
        let err = InputRecord::decode("ACC000000001DEPOSIT").unwrap_err();
        assert_eq!(err, ParseError::TooShort { len: 19, min: 35 });

        assert!(matches!(
            InputRecord::decode(""),
            Err(ParseError::TooShort { len: 0, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_partial_balance() {
        for len in 37..49 {
            let line: String = DEPOSIT_LINE.chars().take(len).collect();
            let err = InputRecord::decode(&line).unwrap_err();
            assert_eq!(
                err,
                ParseError::FieldTruncated {
                    field: "balance",
                    end: 49,
                    len,
                }
            );
            assert!(err.to_string().starts_with("record too short"));
        }
    }

    #[test]
    fn test_decode_rejects_partial_amount() {
        for len in 35..37 {
            let line: String = DEPOSIT_LINE.chars().take(len).collect();
            assert!(matches!(
                InputRecord::decode(&line),
                Err(ParseError::FieldTruncated {
                    field: "amount",
                    end: 37,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_decode_unpadded_legacy_line_is_rejected() {
        // 44 characters: the balance field holds only 7 of its 12 positions.
        let line = "ACC000000001DEPOSIT 202401011000000000500000";
        assert_eq!(line.len(), 44);
        assert!(matches!(
            InputRecord::decode(line),
            Err(ParseError::FieldTruncated {
                field: "balance",
                ..
            })
        ));
    }

    #[test]
    fn test_decode_full_width_line() {
        assert_eq!(DEPOSIT_LINE.len(), input_layout::BALANCE.end());
        assert!(InputRecord::decode(DEPOSIT_LINE).is_ok());
    }

    #[test]
    fn test_decode_invalid_amount() {
        let line = "ACC000000001DEPOSIT 202401010000X0000000000500000";
        let err = InputRecord::decode(line).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumeric {
                field: "amount",
                value: "0000X0000".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_negative_amount() {
        let line = "ACC000000001DEPOSIT 20240101-00000010000000500000";
        let record = InputRecord::decode(line).unwrap();
        assert_eq!(record.amount.to_string(), "-0.10");
    }

    #[test]
    fn test_decode_counts_characters_not_bytes() {
        let line = "ACCÉÉÉÉÉÉÉÉÉDEPOSIT 20240101000010000000000500000";
        let record = InputRecord::decode(line).unwrap();
        assert_eq!(record.account_number, "ACCÉÉÉÉÉÉÉÉÉ");
        assert_eq!(record.amount.to_string(), "100.00");
    }

    #[test]
    fn test_unknown_type_is_kept() {
        let line = "ACC000000001TRANSFER20240101000010000000000500000";
        let record = InputRecord::decode(line).unwrap();
        assert_eq!(record.tx_type, TxType::Other("TRANSFER".to_string()));
        assert!(!record.tx_type.is_known());
        assert_eq!(record.tx_type.to_string(), "TRANSFER");
    }

    #[test]
    fn test_reject_constructors() {
        let r = RejectRecord::parse_failure("short");
        assert_eq!(r.identifier, UNKNOWN_IDENTIFIER);
        assert_eq!(r.reason.code(), "PARSE ERROR");
        assert_eq!(r.original.as_deref(), Some("short"));

        let record = InputRecord::decode(DEPOSIT_LINE).unwrap();
        let r = RejectRecord::invalid(&record, DEPOSIT_LINE);
        assert_eq!(r.identifier, "ACC000000001");
        assert_eq!(r.reason.to_string(), "INVALID RECORD");
    }

    #[test]
    fn test_copy_record_decode() {
        let record = CopyRecord::decode("FIELD1    FILLER_DATA_HERE    FIELD2    ");
        assert_eq!(record.first, "FIELD1");
        assert_eq!(record.second, "FIELD2");
    }

    #[test]
    fn test_copy_record_short_line_is_padded() {
        let record = CopyRecord::decode("ABC");
        assert_eq!(record.first, "ABC");
        assert_eq!(record.second, "");

        let record = CopyRecord::decode("");
        assert_eq!(record.first, "");
    }

    #[test]
    fn test_layout_widths() {
        assert_eq!(input_layout::BALANCE.end(), 49);
        assert_eq!(output_layout::AMOUNT.end(), output_layout::WIDTH);
        assert_eq!(copy_layout::OUT_SECOND.end(), copy_layout::WIDTH);
    }
}
