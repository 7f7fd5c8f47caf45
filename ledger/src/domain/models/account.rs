//! Domain model for a bank account.
//!
//! An account owns a balance, a PIN credential, and an append-only
//! transaction history kept most-recent-first. Every mutation appends
//! exactly one formatted entry carrying the post-mutation balance, so
//! the history is the full audit trail.

use chrono::Local;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The history never grows past this many entries; the oldest are
/// dropped, never the newest.
pub const HISTORY_CAP: usize = 200;

/// Default number of entries shown by the recent-activity view.
pub const RECENT_ENTRY_COUNT: usize = 8;

/// The two supported account products. The kind is fixed at creation
/// time; the interest rate is stored metadata only, nothing in this
/// crate accrues it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    Savings,
    Checking,
}

impl AccountKind {
    /// Human-facing product label.
    pub fn display_name(&self) -> &'static str {
        match self {
            AccountKind::Savings => "Savings Account",
            AccountKind::Checking => "Checking Account",
        }
    }

    /// Annual interest rate attached to the product.
    pub fn interest_rate(&self) -> Decimal {
        match self {
            AccountKind::Savings => Decimal::new(2, 2), // 0.02
            AccountKind::Checking => Decimal::ZERO,
        }
    }

    /// Literal name used in the store file.
    pub fn wire_name(&self) -> &'static str {
        match self {
            AccountKind::Savings => "SAVINGS",
            AccountKind::Checking => "CHECKING",
        }
    }

    /// Parse a wire name. Returns `None` for anything unknown so the
    /// caller can decide how lenient to be.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        match name {
            "SAVINGS" => Some(AccountKind::Savings),
            "CHECKING" => Some(AccountKind::Checking),
            _ => None,
        }
    }
}

impl Default for AccountKind {
    fn default() -> Self {
        AccountKind::Savings
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A single account: identity, credential, balance, and history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub owner_name: String,
    pub phone: String,
    pub pin: String,
    pub balance: Decimal,
    pub kind: AccountKind,
    /// Formatted entries, most recent first, capped at [`HISTORY_CAP`].
    pub history: Vec<String>,
}

impl Account {
    /// Create a fresh account with a zero balance and the synthetic
    /// opening entry.
    pub fn new(
        id: impl Into<String>,
        owner_name: impl Into<String>,
        phone: impl Into<String>,
        pin: impl Into<String>,
        kind: AccountKind,
    ) -> Self {
        let mut account = Self {
            id: id.into(),
            owner_name: owner_name.into(),
            phone: phone.into(),
            pin: pin.into(),
            balance: Decimal::ZERO,
            kind,
            history: Vec::new(),
        };
        account.add_entry(&format!("Account opened - {}", kind.display_name()), None);
        account
    }

    /// Rebuild an account from persisted fields. No opening entry is
    /// added; the history comes verbatim from the store.
    pub fn from_saved(
        id: String,
        owner_name: String,
        phone: String,
        pin: String,
        balance: Decimal,
        kind: AccountKind,
        history: Vec<String>,
    ) -> Self {
        Self {
            id,
            owner_name,
            phone,
            pin,
            balance,
            kind,
            history,
        }
    }

    /// Whether a withdrawal of `amount` would keep the balance
    /// non-negative.
    pub fn can_withdraw(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }

    /// Credit the account. Non-positive amounts are rejected without
    /// mutation.
    pub fn deposit(&mut self, amount: Decimal, reason: Option<&str>) -> bool {
        if amount <= Decimal::ZERO {
            return false;
        }
        self.balance += amount;
        self.add_entry(&format!("Deposit {}", format_money(amount)), reason);
        true
    }

    /// Debit the account. Fails without mutation when the amount is
    /// non-positive or would take the balance below zero.
    pub fn withdraw(&mut self, amount: Decimal, reason: Option<&str>) -> bool {
        if amount <= Decimal::ZERO || !self.can_withdraw(amount) {
            return false;
        }
        self.balance -= amount;
        self.add_entry(&format!("Withdraw {}", format_money(amount)), reason);
        true
    }

    /// Move `amount` from this account to `other`. Guarded by the same
    /// check as [`withdraw`](Self::withdraw); on success both sides are
    /// mutated and each gets one entry with its own balance snapshot.
    pub fn transfer_to(&mut self, other: &mut Account, amount: Decimal, reason: Option<&str>) -> bool {
        if amount <= Decimal::ZERO || !self.can_withdraw(amount) {
            return false;
        }
        self.balance -= amount;
        other.balance += amount;
        self.add_entry(
            &format!("Transfer to {} {}", other.id, format_money(amount)),
            reason,
        );
        other.add_entry(
            &format!("Transfer from {} {}", self.id, format_money(amount)),
            reason,
        );
        true
    }

    /// Overwrite the PIN. The caller is expected to have verified the
    /// old PIN already; this only records the change.
    pub fn change_pin(&mut self, new_pin: &str) {
        self.pin = new_pin.to_string();
        self.add_entry("PIN changed", None);
    }

    /// Append one formatted entry to the front of the history and trim
    /// to the cap.
    pub fn add_entry(&mut self, description: &str, reason: Option<&str>) {
        let mut entry = format!(
            "{} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            description
        );
        if let Some(reason) = reason.filter(|r| !r.is_empty()) {
            entry.push_str(&format!(" ({})", reason));
        }
        entry.push_str(&format!(" - Bal: {}", format_money(self.balance)));
        self.history.insert(0, entry);
        self.history.truncate(HISTORY_CAP);
    }

    /// The `n` most recent entries (fewer if the history is shorter).
    pub fn recent_entries(&self, n: usize) -> &[String] {
        &self.history[..self.history.len().min(n)]
    }

    /// The full history, most recent first.
    pub fn all_entries(&self) -> &[String] {
        &self.history
    }

    /// Recent activity as display text, one entry per line.
    pub fn recent_text(&self, n: usize) -> String {
        if self.history.is_empty() {
            return "No activity yet.".to_string();
        }
        self.recent_entries(n).join("\n")
    }

    /// Full history as display text, one entry per line.
    pub fn all_text(&self) -> String {
        if self.history.is_empty() {
            return "No transactions.".to_string();
        }
        self.history.join("\n")
    }
}

/// Render a monetary amount with two decimals and thousands grouping,
/// e.g. `1,234,567.50`.
pub fn format_money(amount: Decimal) -> String {
    let rendered = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_account() -> Account {
        Account::new("1001", "Alice", "9876543210", "1234", AccountKind::Savings)
    }

    #[test]
    fn kind_metadata() {
        assert_eq!(AccountKind::Savings.display_name(), "Savings Account");
        assert_eq!(AccountKind::Checking.display_name(), "Checking Account");
        assert_eq!(AccountKind::Savings.interest_rate(), dec!(0.02));
        assert_eq!(AccountKind::Checking.interest_rate(), dec!(0));
        assert_eq!(
            AccountKind::from_wire_name("CHECKING"),
            Some(AccountKind::Checking)
        );
        assert_eq!(AccountKind::from_wire_name("PREMIUM"), None);
        assert_eq!(AccountKind::default(), AccountKind::Savings);
    }

    #[test]
    fn new_account_has_opening_entry_and_zero_balance() {
        let account = test_account();
        assert_eq!(account.balance, Decimal::ZERO);
        assert_eq!(account.history.len(), 1);
        assert!(account.history[0].contains("Account opened - Savings Account"));
        assert!(account.history[0].contains("Bal: 0.00"));
    }

    #[test]
    fn deposit_updates_balance_and_history() {
        let mut account = test_account();
        assert!(account.deposit(dec!(500.00), None));
        assert_eq!(account.balance, dec!(500.00));
        assert_eq!(account.history.len(), 2);
        assert!(account.history[0].contains("Deposit 500.00"));
        assert!(account.history[0].contains("Bal: 500.00"));
    }

    #[test]
    fn deposit_rejects_non_positive_amounts() {
        let mut account = test_account();
        assert!(!account.deposit(dec!(0), None));
        assert!(!account.deposit(dec!(-10), None));
        assert_eq!(account.balance, Decimal::ZERO);
        assert_eq!(account.history.len(), 1);
    }

    #[test]
    fn withdraw_respects_balance_floor() {
        let mut account = test_account();
        account.deposit(dec!(500.00), None);
        assert!(!account.withdraw(dec!(600.00), None));
        assert_eq!(account.balance, dec!(500.00));
        assert_eq!(account.history.len(), 2);

        assert!(account.withdraw(dec!(200.00), None));
        assert_eq!(account.balance, dec!(300.00));
        assert!(account.history[0].contains("Withdraw 200.00"));
    }

    #[test]
    fn withdraw_rejects_non_positive_amounts() {
        let mut account = test_account();
        account.deposit(dec!(50), None);
        assert!(!account.withdraw(dec!(0), None));
        assert!(!account.withdraw(dec!(-1), None));
        assert_eq!(account.balance, dec!(50));
    }

    #[test]
    fn exact_balance_withdrawal_is_allowed() {
        let mut account = test_account();
        account.deposit(dec!(75.25), None);
        assert!(account.withdraw(dec!(75.25), None));
        assert_eq!(account.balance, Decimal::ZERO);
    }

    #[test]
    fn transfer_moves_funds_and_writes_both_histories() {
        let mut alice = test_account();
        let mut bob = Account::new("1002", "Bob", "0123456789", "5678", AccountKind::Checking);
        alice.deposit(dec!(500.00), None);

        assert!(alice.transfer_to(&mut bob, dec!(200.00), None));
        assert_eq!(alice.balance, dec!(300.00));
        assert_eq!(bob.balance, dec!(200.00));
        assert!(alice.history[0].contains("Transfer to 1002 200.00"));
        assert!(alice.history[0].contains("Bal: 300.00"));
        assert!(bob.history[0].contains("Transfer from 1001 200.00"));
        assert!(bob.history[0].contains("Bal: 200.00"));
    }

    #[test]
    fn transfer_conserves_total_balance() {
        let mut alice = test_account();
        let mut bob = Account::new("1002", "Bob", "0123456789", "5678", AccountKind::Savings);
        alice.deposit(dec!(123.45), None);
        bob.deposit(dec!(10.55), None);
        let before = alice.balance + bob.balance;

        assert!(alice.transfer_to(&mut bob, dec!(99.45), None));
        assert_eq!(alice.balance + bob.balance, before);
    }

    #[test]
    fn failed_transfer_leaves_both_sides_untouched() {
        let mut alice = test_account();
        let mut bob = Account::new("1002", "Bob", "0123456789", "5678", AccountKind::Savings);
        alice.deposit(dec!(100), None);

        assert!(!alice.transfer_to(&mut bob, dec!(100.01), None));
        assert_eq!(alice.balance, dec!(100));
        assert_eq!(bob.balance, Decimal::ZERO);
        assert_eq!(alice.history.len(), 2);
        assert_eq!(bob.history.len(), 1);
    }

    #[test]
    fn history_is_most_recent_first() {
        let mut account = test_account();
        account.deposit(dec!(100), None);
        account.withdraw(dec!(40), None);
        assert!(account.history[0].contains("Withdraw"));
        assert!(account.history[1].contains("Deposit"));
        assert!(account.history[2].contains("Account opened"));
    }

    #[test]
    fn history_trims_oldest_beyond_cap() {
        let mut account = test_account();
        for _ in 0..250 {
            account.deposit(dec!(1), None);
        }
        assert_eq!(account.history.len(), HISTORY_CAP);
        // The newest entry survives; the opening entry was trimmed.
        assert!(account.history[0].contains("Bal: 250.00"));
        assert!(!account.history.iter().any(|e| e.contains("Account opened")));
    }

    #[test]
    fn reason_is_recorded_in_parentheses() {
        let mut account = test_account();
        account.deposit(dec!(25), Some("birthday gift"));
        assert!(account.history[0].contains("(birthday gift)"));

        account.deposit(dec!(25), Some(""));
        assert!(!account.history[0].contains("()"));
    }

    #[test]
    fn change_pin_records_entry() {
        let mut account = test_account();
        account.change_pin("4321");
        assert_eq!(account.pin, "4321");
        assert!(account.history[0].contains("PIN changed"));
    }

    #[test]
    fn recent_entries_limits_count() {
        let mut account = test_account();
        for _ in 0..12 {
            account.deposit(dec!(1), None);
        }
        assert_eq!(account.recent_entries(RECENT_ENTRY_COUNT).len(), 8);
        assert_eq!(account.recent_text(RECENT_ENTRY_COUNT).lines().count(), 8);
        assert_eq!(account.all_entries().len(), 13);
    }

    #[test]
    fn empty_history_placeholders() {
        let account = Account::from_saved(
            "1001".into(),
            "Alice".into(),
            "9876543210".into(),
            "1234".into(),
            Decimal::ZERO,
            AccountKind::Savings,
            Vec::new(),
        );
        assert_eq!(account.recent_text(RECENT_ENTRY_COUNT), "No activity yet.");
        assert_eq!(account.all_text(), "No transactions.");
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(dec!(0)), "0.00");
        assert_eq!(format_money(dec!(5)), "5.00");
        assert_eq!(format_money(dec!(1000)), "1,000.00");
        assert_eq!(format_money(dec!(1234567.5)), "1,234,567.50");
        assert_eq!(format_money(dec!(-9876.543)), "-9,876.54");
    }

    #[test]
    fn repeated_cent_arithmetic_stays_exact() {
        let mut account = test_account();
        for _ in 0..1000 {
            account.deposit(dec!(0.10), None);
        }
        assert_eq!(account.balance, dec!(100.00));
    }
}
