//! Line codec for the account store.
//!
//! One account per line:
//!
//! ```text
//! id|name|phone|pin|balance|KIND|entry1;;entry2;;...
//! ```
//!
//! Fields are `|`-delimited and entries `;;`-delimited, so both
//! delimiters are replaced by escape tokens inside the name, the
//! phone, and each entry before encoding. The pin, balance, kind and
//! id are delimiter-free by construction. The balance is written with
//! its native precision so it re-parses to the exact same value.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::models::account::{Account, AccountKind};

const FIELD_SEP: char = '|';
const ENTRY_SEP: &str = ";;";
const FIELD_ESCAPE: &str = "%PIPE%";
const ENTRY_ESCAPE: &str = "%SEMI2%";

/// Field cap for the split: everything after the sixth `|` belongs to
/// the entries blob, so a stray unescaped delimiter there cannot
/// over-split the record.
const MAX_FIELDS: usize = 7;
const MIN_FIELDS: usize = 6;

/// Decode failure for a single store line.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("account record has {0} fields, expected at least 6")]
    TooFewFields(usize),
}

fn escape(s: &str) -> String {
    s.replace(FIELD_SEP, FIELD_ESCAPE).replace(ENTRY_SEP, ENTRY_ESCAPE)
}

fn unescape(s: &str) -> String {
    s.replace(FIELD_ESCAPE, "|").replace(ENTRY_ESCAPE, ENTRY_SEP)
}

/// Encode one account as a single store line.
pub fn encode(account: &Account) -> String {
    let entries = account
        .history
        .iter()
        .map(|entry| escape(entry))
        .collect::<Vec<_>>()
        .join(ENTRY_SEP);
    format!(
        "{}|{}|{}|{}|{}|{}|{}",
        account.id,
        escape(&account.owner_name),
        escape(&account.phone),
        account.pin,
        account.balance,
        account.kind.wire_name(),
        entries,
    )
}

/// Decode one store line back into an account.
///
/// Lenient where the original data could be dirty: an unparseable
/// balance decodes to zero and an unknown kind falls back to the
/// default, so a single odd field never costs the whole account. Only
/// a structurally short record is an error.
pub fn decode(line: &str) -> Result<Account, CodecError> {
    let parts: Vec<&str> = line.splitn(MAX_FIELDS, FIELD_SEP).collect();
    if parts.len() < MIN_FIELDS {
        return Err(CodecError::TooFewFields(parts.len()));
    }

    let balance = Decimal::from_str(parts[4]).unwrap_or_default();
    let kind = AccountKind::from_wire_name(parts[5]).unwrap_or_default();
    let history = match parts.get(6) {
        Some(blob) if !blob.is_empty() => blob
            .split(ENTRY_SEP)
            .filter(|entry| !entry.is_empty())
            .map(unescape)
            .collect(),
        _ => Vec::new(),
    };

    Ok(Account::from_saved(
        parts[0].to_string(),
        unescape(parts[1]),
        unescape(parts[2]),
        parts[3].to_string(),
        balance,
        kind,
        history,
    ))
}
