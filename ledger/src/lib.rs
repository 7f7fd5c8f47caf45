//! # bank-ledger
//!
//! Single-node account ledger: named accounts with a PIN credential,
//! a decimal balance, and an append-only transaction history, all
//! mirrored to a flat file so state survives restarts.
//!
//! [`AccountService`] is the sole entry point for callers. It owns the
//! registry of accounts, mints ids, authenticates, delegates balance
//! operations to the [`Account`] entities, and persists every
//! mutation through the [`AccountStore`] (write-then-rename, one
//! delimited line per account).

pub mod domain;
pub mod storage;

pub use domain::account_service::{AccountService, OperationStatus};
pub use domain::models::account::{format_money, Account, AccountKind, RECENT_ENTRY_COUNT};
pub use storage::store::AccountStore;
