//! Fixed-width renderers.
//!
//! All functions are stateless; every line they return has the exact width
//! of its record type.

use crate::record::{
    copy_layout, output_layout, CopyOutputRecord, OutputRecord, RejectRecord, REJECT_WIDTH,
};

/// Left-justifies `s` in `width` characters, truncating if it is longer.
pub fn pad_text(s: &str, width: usize) -> String {
    let truncated: String = s.chars().take(width).collect();
    format!("{:<width$}", truncated)
}

/// Renders a processed record as a 45-character line.
pub fn format_output(record: &OutputRecord) -> String {
    use output_layout::*;

    let mut line = String::with_capacity(WIDTH);
    line.push_str(&pad_text(&record.account_number, ACCOUNT.width));
    line.push_str(&pad_text(record.tx_type.as_str(), TX_TYPE.width));
    line.push_str(&record.new_balance.to_implied(NEW_BALANCE.width));
    line.push_str(&record.amount.to_implied(AMOUNT.width));
    line
}

/// Renders a reject as an 80-character line: the original input if present,
/// otherwise the reason code.
pub fn format_reject(record: &RejectRecord) -> String {
    let text = record
        .original
        .as_deref()
        .unwrap_or_else(|| record.reason.code());
    pad_text(text, REJECT_WIDTH)
}

/// Renders a copy-transform record as a 40-character line.
pub fn format_copy(record: &CopyOutputRecord) -> String {
    use copy_layout::*;

    let mut line = String::with_capacity(WIDTH);
    line.push_str(&pad_text(&record.first, OUT_FIRST.width));
    line.push_str(&pad_text(&record.injected, OUT_INJECTED.width));
    line.push_str(&pad_text(&record.second, OUT_SECOND.width));
    line
}

/// Groups digits in thousands: `1234567` becomes `"1,234,567"`.
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
