//! Service owning the registry of accounts.
//!
//! Sole entry point for callers: it mints account ids, authenticates,
//! delegates balance operations to the accounts, and mirrors every
//! mutation to the store. Insertion order is preserved so the store
//! file is written deterministically.

use anyhow::{Context, Result};
use log::{info, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::domain::models::account::{Account, AccountKind};
use crate::storage::store::AccountStore;

/// Ids are minted from a monotonic counter starting here; loading a
/// store advances the counter past the highest numeric id seen.
const FIRST_ACCOUNT_ID: u32 = 1001;

/// Outcome of a balance-mutating operation. Business-rule failures
/// are values, not errors; only store I/O uses the error path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    /// The mutation was applied; carries the post-operation balance of
    /// the account the caller acted on (the source, for transfers).
    Completed { balance: Decimal },
    /// The amount was zero or negative; nothing changed.
    InvalidAmount,
    /// A debit would have taken the balance below zero; nothing
    /// changed.
    InsufficientFunds,
    /// No account with that id (or, for transfers, source and
    /// destination are the same account); nothing changed.
    NotFound,
}

/// Registry of all accounts plus id assignment and persistence.
pub struct AccountService {
    store: AccountStore,
    accounts: HashMap<String, Account>,
    /// Account ids in insertion order, for deterministic saves.
    order: Vec<String>,
    next_id: u32,
}

impl AccountService {
    /// Load the registry from the store. A missing store file means an
    /// empty registry.
    pub fn open(store: AccountStore) -> Result<Self> {
        let loaded = store.load()?;

        let mut accounts = HashMap::new();
        let mut order = Vec::new();
        let mut next_id = FIRST_ACCOUNT_ID;
        for account in loaded {
            if let Ok(numeric) = account.id.parse::<u32>() {
                if numeric >= next_id {
                    next_id = numeric + 1;
                }
            }
            order.push(account.id.clone());
            accounts.insert(account.id.clone(), account);
        }

        info!("registry opened with {} accounts, next id {}", order.len(), next_id);
        Ok(Self {
            store,
            accounts,
            order,
            next_id,
        })
    }

    /// Create a new account with a zero balance and persist the
    /// registry. Returns a snapshot of the new account.
    pub fn create_account(
        &mut self,
        name: &str,
        phone: &str,
        pin: &str,
        kind: AccountKind,
    ) -> Result<Account> {
        // The counter is monotonic, but re-check against the map in
        // case the store held an id ahead of it.
        let id = loop {
            let candidate = self.next_id.to_string();
            self.next_id += 1;
            if !self.accounts.contains_key(&candidate) {
                break candidate;
            }
        };

        let account = Account::new(id.clone(), name, phone, pin, kind);
        self.accounts.insert(id.clone(), account.clone());
        self.order.push(id.clone());
        info!("created {} account {} for {}", account.kind.wire_name(), id, name);

        self.persist()?;
        Ok(account)
    }

    /// Look up an account and check its PIN by exact equality.
    pub fn authenticate(&self, id: &str, pin: &str) -> Option<&Account> {
        self.accounts.get(id).filter(|account| account.pin == pin)
    }

    pub fn get_account(&self, id: &str) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn account_exists(&self, id: &str) -> bool {
        self.accounts.contains_key(id)
    }

    /// All accounts in insertion order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.order.iter().filter_map(|id| self.accounts.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Credit an account and persist.
    pub fn deposit(
        &mut self,
        id: &str,
        amount: Decimal,
        reason: Option<&str>,
    ) -> Result<OperationStatus> {
        if amount <= Decimal::ZERO {
            return Ok(OperationStatus::InvalidAmount);
        }
        let Some(account) = self.accounts.get_mut(id) else {
            warn!("deposit on unknown account {}", id);
            return Ok(OperationStatus::NotFound);
        };
        account.deposit(amount, reason);
        let balance = account.balance;

        self.persist()?;
        Ok(OperationStatus::Completed { balance })
    }

    /// Debit an account and persist. Fails as a value when the funds
    /// are insufficient.
    pub fn withdraw(
        &mut self,
        id: &str,
        amount: Decimal,
        reason: Option<&str>,
    ) -> Result<OperationStatus> {
        if amount <= Decimal::ZERO {
            return Ok(OperationStatus::InvalidAmount);
        }
        let Some(account) = self.accounts.get_mut(id) else {
            warn!("withdraw on unknown account {}", id);
            return Ok(OperationStatus::NotFound);
        };
        if !account.withdraw(amount, reason) {
            return Ok(OperationStatus::InsufficientFunds);
        }
        let balance = account.balance;

        self.persist()?;
        Ok(OperationStatus::Completed { balance })
    }

    /// Move funds between two accounts and persist. Either both sides
    /// mutate or neither does.
    pub fn transfer(
        &mut self,
        from_id: &str,
        to_id: &str,
        amount: Decimal,
        reason: Option<&str>,
    ) -> Result<OperationStatus> {
        if amount <= Decimal::ZERO {
            return Ok(OperationStatus::InvalidAmount);
        }
        if from_id == to_id {
            warn!("transfer from account {} to itself rejected", from_id);
            return Ok(OperationStatus::NotFound);
        }
        if !self.accounts.contains_key(from_id) {
            warn!("transfer from unknown account {}", from_id);
            return Ok(OperationStatus::NotFound);
        }

        // Take the destination out of the map so source and
        // destination can be mutated together; the order vector keeps
        // its save position.
        let Some(mut destination) = self.accounts.remove(to_id) else {
            warn!("transfer to unknown account {}", to_id);
            return Ok(OperationStatus::NotFound);
        };
        let source = self
            .accounts
            .get_mut(from_id)
            .expect("source existence checked above");

        let moved = source.transfer_to(&mut destination, amount, reason);
        let balance = source.balance;
        self.accounts.insert(destination.id.clone(), destination);

        if !moved {
            return Ok(OperationStatus::InsufficientFunds);
        }
        self.persist()?;
        Ok(OperationStatus::Completed { balance })
    }

    /// Set a new PIN on an account and persist. The caller verifies
    /// the old PIN (via [`authenticate`](Self::authenticate)) first.
    /// Returns `false` when the account does not exist.
    pub fn change_pin(&mut self, id: &str, new_pin: &str) -> Result<bool> {
        let Some(account) = self.accounts.get_mut(id) else {
            warn!("pin change on unknown account {}", id);
            return Ok(false);
        };
        account.change_pin(new_pin);
        info!("pin changed on account {}", id);

        self.persist()?;
        Ok(true)
    }

    /// Serialize every account, in insertion order, to the store.
    pub fn save_accounts(&self) -> Result<()> {
        self.store.save(self.accounts())
    }

    // A failed save does not roll back the in-memory mutation that
    // triggered it; the error carries that fact to the caller.
    fn persist(&self) -> Result<()> {
        self.save_accounts()
            .context("account mutation applied but saving the store failed")
    }
}
