//! # Account Pool
//!
//! Derives signing identities from newline-separated raw private keys.
//! Lines are filtered, never validated with feedback: a line that is not a
//! 64-hex-character key (optionally `0x` prefixed) is dropped and only
//! counted.

use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use ethers::utils::to_checksum;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::warn;
use zeroize::Zeroizing;

use crate::error::ConfigError;

static KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0x)?[0-9a-fA-F]{64}$").expect("static key regex"));

static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("static address regex"));

/// A signing identity derived from one private key.
#[derive(Clone)]
pub struct Account {
    address: Address,
    signer: LocalWallet,
}

impl Account {
    /// Derive an account from a canonical `0x`-prefixed lowercase key.
    fn derive(canonical_key: &str) -> Option<Self> {
        let bytes = Zeroizing::new(hex::decode(&canonical_key[2..]).ok()?);
        let signer = LocalWallet::from_bytes(&bytes).ok()?;
        Some(Self {
            address: signer.address(),
            signer,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> &LocalWallet {
        &self.signer
    }

    /// `0xAbCd...1234` form used in log lines.
    pub fn short_address(&self) -> String {
        short_address(&self.address)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("signer", &"***REDACTED***")
            .finish()
    }
}

/// Ordered, immutable set of accounts. Replaced wholesale on every key import.
#[derive(Debug, Clone, Default)]
pub struct AccountPool {
    accounts: Arc<Vec<Account>>,
    rejected: usize,
}

impl AccountPool {
    /// Parse raw key text, one key per line.
    ///
    /// Blank lines and `#` comments are ignored. Order and duplicates are
    /// preserved.
    pub fn parse(raw: &str) -> Self {
        let mut accounts = Vec::new();
        let mut rejected = 0;

        for line in raw.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match normalize_key(trimmed).and_then(|key| Account::derive(&key)) {
                Some(account) => accounts.push(account),
                None => rejected += 1,
            }
        }

        if rejected > 0 {
            warn!("Dropped {} line(s) that are not private keys", rejected);
        }

        Self {
            accounts: Arc::new(accounts),
            rejected,
        }
    }

    pub fn accounts(&self) -> Arc<Vec<Account>> {
        Arc::clone(&self.accounts)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Number of non-blank, non-comment lines that were dropped.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.accounts.iter().map(Account::address).collect()
    }
}

/// Read a key file without deriving anything from it.
pub fn read_key_file(path: &str) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
            path: path.to_string(),
        },
        _ => ConfigError::IoError {
            path: path.to_string(),
            msg: e.to_string(),
        },
    })
}

/// Canonical form of an accepted key: `0x` followed by 64 lowercase hex chars.
fn normalize_key(line: &str) -> Option<Zeroizing<String>> {
    if !KEY_RE.is_match(line) {
        return None;
    }
    let hex_part = line.strip_prefix("0x").unwrap_or(line);
    Some(Zeroizing::new(format!("0x{}", hex_part.to_ascii_lowercase())))
}

/// Parse a destination address.
///
/// Requires `0x` plus 40 hex chars. All-lowercase or all-uppercase input is
/// accepted as is; mixed case must match the EIP-55 checksum.
pub fn parse_address(input: &str) -> Result<Address, ConfigError> {
    let input = input.trim();
    let invalid = || ConfigError::InvalidDestination {
        address: input.to_string(),
    };

    if !ADDRESS_RE.is_match(input) {
        return Err(invalid());
    }

    let bytes = hex::decode(&input[2..]).map_err(|_| invalid())?;
    let address = Address::from_slice(&bytes);

    let body = &input[2..];
    let mixed_case = body.chars().any(|c| c.is_ascii_lowercase())
        && body.chars().any(|c| c.is_ascii_uppercase());
    if mixed_case && to_checksum(&address, None) != input {
        return Err(invalid());
    }

    Ok(address)
}

pub fn short_address(address: &Address) -> String {
    let full = to_checksum(address, None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}
