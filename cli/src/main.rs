//! Command-line boundary for the bank ledger.
//!
//! This binary is the collaborator the core expects on the other side
//! of its API: it validates user-supplied strings (digit-only PIN and
//! phone, positive decimal amounts) before calling into the ledger,
//! authenticates with id + PIN for every account-scoped command, and
//! maps operation outcomes to messages and the exit code. All business
//! rules live in `bank-ledger`.

use anyhow::Result;
use bank_ledger::{
    format_money, AccountKind, AccountService, AccountStore, OperationStatus, RECENT_ENTRY_COUNT,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "bank-cli", version, about = "Single-node account ledger")]
struct Cli {
    /// Path to the account store file.
    #[arg(long, default_value = "accounts.db")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a new account.
    Create {
        name: String,
        /// 10-digit phone number.
        phone: String,
        /// 4-digit PIN.
        pin: String,
        #[arg(value_enum, default_value = "savings")]
        kind: KindArg,
    },
    /// Deposit into an account.
    Deposit {
        id: String,
        pin: String,
        amount: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Withdraw from an account.
    Withdraw {
        id: String,
        pin: String,
        amount: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Transfer between two accounts.
    Transfer {
        from: String,
        pin: String,
        to: String,
        amount: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Change the PIN on an account.
    ChangePin {
        id: String,
        old_pin: String,
        new_pin: String,
    },
    /// Print recent activity (or the full history with --all).
    History {
        id: String,
        pin: String,
        #[arg(long)]
        all: bool,
    },
    /// Print an account summary.
    Show {
        id: String,
        pin: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Savings,
    Checking,
}

impl From<KindArg> for AccountKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Savings => AccountKind::Savings,
            KindArg::Checking => AccountKind::Checking,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    debug!("using store file {}", cli.store.display());
    let mut service = AccountService::open(AccountStore::new(cli.store))?;

    match cli.command {
        Command::Create { name, phone, pin, kind } => {
            if name.trim().is_empty() {
                eprintln!("Name must not be empty.");
                return Ok(false);
            }
            if !is_digits(&phone, 10) {
                eprintln!("Phone must be exactly 10 digits.");
                return Ok(false);
            }
            if !is_digits(&pin, 4) {
                eprintln!("PIN must be exactly 4 digits.");
                return Ok(false);
            }
            let account = service.create_account(name.trim(), &phone, &pin, kind.into())?;
            println!(
                "Created {} {} for {} (balance {})",
                account.kind,
                account.id,
                account.owner_name,
                format_money(account.balance)
            );
            Ok(true)
        }
        Command::Deposit { id, pin, amount, reason } => {
            let Some(amount) = parse_amount(&amount) else {
                eprintln!("Amount must be a positive number.");
                return Ok(false);
            };
            if !login(&service, &id, &pin) {
                return Ok(false);
            }
            let status = service.deposit(&id, amount, reason.as_deref())?;
            report(status, "Deposited")
        }
        Command::Withdraw { id, pin, amount, reason } => {
            let Some(amount) = parse_amount(&amount) else {
                eprintln!("Amount must be a positive number.");
                return Ok(false);
            };
            if !login(&service, &id, &pin) {
                return Ok(false);
            }
            let status = service.withdraw(&id, amount, reason.as_deref())?;
            report(status, "Withdrew")
        }
        Command::Transfer { from, pin, to, amount, reason } => {
            let Some(amount) = parse_amount(&amount) else {
                eprintln!("Amount must be a positive number.");
                return Ok(false);
            };
            if !login(&service, &from, &pin) {
                return Ok(false);
            }
            if !service.account_exists(&to) {
                eprintln!("Recipient account {to} does not exist.");
                return Ok(false);
            }
            let status = service.transfer(&from, &to, amount, reason.as_deref())?;
            report(status, "Transferred")
        }
        Command::ChangePin { id, old_pin, new_pin } => {
            if !is_digits(&new_pin, 4) {
                eprintln!("New PIN must be exactly 4 digits.");
                return Ok(false);
            }
            if !login(&service, &id, &old_pin) {
                return Ok(false);
            }
            service.change_pin(&id, &new_pin)?;
            println!("PIN updated.");
            Ok(true)
        }
        Command::History { id, pin, all } => {
            if !login(&service, &id, &pin) {
                return Ok(false);
            }
            let account = service
                .get_account(&id)
                .expect("authenticated account exists");
            if all {
                println!("{}", account.all_text());
            } else {
                println!("{}", account.recent_text(RECENT_ENTRY_COUNT));
            }
            Ok(true)
        }
        Command::Show { id, pin, json } => {
            if !login(&service, &id, &pin) {
                return Ok(false);
            }
            let account = service
                .get_account(&id)
                .expect("authenticated account exists");
            if json {
                println!("{}", serde_json::to_string_pretty(account)?);
            } else {
                println!("Account:  {}", account.id);
                println!("Owner:    {}", account.owner_name);
                println!("Phone:    {}", account.phone);
                println!("Type:     {}", account.kind);
                println!("Interest: {}", account.kind.interest_rate());
                println!("Balance:  {}", format_money(account.balance));
            }
            Ok(true)
        }
    }
}

fn login(service: &AccountService, id: &str, pin: &str) -> bool {
    if service.authenticate(id, pin).is_none() {
        eprintln!("Account not found or incorrect PIN.");
        return false;
    }
    true
}

fn report(status: OperationStatus, verb: &str) -> Result<bool> {
    match status {
        OperationStatus::Completed { balance } => {
            println!("{verb}. New balance: {}", format_money(balance));
            Ok(true)
        }
        OperationStatus::InsufficientFunds => {
            eprintln!("Insufficient funds.");
            Ok(false)
        }
        OperationStatus::InvalidAmount => {
            eprintln!("Amount must be a positive number.");
            Ok(false)
        }
        OperationStatus::NotFound => {
            eprintln!("Account not found.");
            Ok(false)
        }
    }
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(s).ok().filter(|amount| *amount > Decimal::ZERO)
}
