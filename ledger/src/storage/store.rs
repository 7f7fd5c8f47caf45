//! Flat-file account store.
//!
//! All accounts live in one line-oriented UTF-8 file. Saves go
//! through a temp file that is renamed over the primary, so a crash
//! mid-write leaves the previous store intact. Loads tolerate
//! individual malformed lines: they are logged and skipped so the
//! rest of the file stays available.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::domain::models::account::Account;
use crate::storage::codec;

/// Handle on the on-disk store file.
#[derive(Debug, Clone)]
pub struct AccountStore {
    path: PathBuf,
}

impl AccountStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every account from the store file. A missing file is an
    /// empty store, not an error; a malformed line costs only itself.
    pub fn load(&self) -> Result<Vec<Account>> {
        if !self.path.exists() {
            debug!("store file {} does not exist, starting empty", self.path.display());
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("failed to open store file {}", self.path.display()))?;
        let reader = BufReader::new(file);

        let mut accounts = Vec::new();
        for line in reader.lines() {
            let line = line.context("failed to read store file")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match codec::decode(line) {
                Ok(account) => accounts.push(account),
                Err(err) => warn!("skipping malformed account record: {}", err),
            }
        }

        debug!("loaded {} accounts from {}", accounts.len(), self.path.display());
        Ok(accounts)
    }

    /// Write every account, then atomically replace the primary file.
    ///
    /// `fs::rename` replaces the destination in one step on POSIX; on
    /// platforms where it refuses to, the remove-then-rename fallback
    /// leaves a short window with no primary file.
    pub fn save<'a>(&self, accounts: impl IntoIterator<Item = &'a Account>) -> Result<()> {
        let tmp = self.tmp_path();
        {
            let file = File::create(&tmp)
                .with_context(|| format!("failed to create temp store file {}", tmp.display()))?;
            let mut writer = BufWriter::new(file);
            for account in accounts {
                writeln!(writer, "{}", codec::encode(account))
                    .context("failed to write account record")?;
            }
            writer.flush().context("failed to flush temp store file")?;
        }

        if fs::rename(&tmp, &self.path).is_err() {
            if self.path.exists() {
                fs::remove_file(&self.path)
                    .with_context(|| format!("failed to remove old store file {}", self.path.display()))?;
            }
            fs::rename(&tmp, &self.path).with_context(|| {
                format!("failed to move temp store file over {}", self.path.display())
            })?;
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}
