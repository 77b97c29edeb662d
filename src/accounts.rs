use crate::proxy::ProxyDescriptor;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::warn;

/// A secret key held for the duration of a run. The address is always derived.
#[derive(Clone)]
pub struct Account {
    signer: PrivateKeySigner,
}

impl Account {
    pub fn from_hex(key: &str) -> Result<Self> {
        let raw = key.trim();
        let bytes = hex::decode(raw.strip_prefix("0x").unwrap_or(raw))
            .map_err(|e| anyhow::anyhow!("Private key is not valid hex: {}", e))?;
        if bytes.len() != 32 {
            return Err(anyhow::anyhow!(
                "Private key must be 32 bytes, got {}",
                bytes.len()
            ));
        }
        let signer = PrivateKeySigner::from_slice(&bytes)
            .map_err(|e| anyhow::anyhow!("Invalid private key: {}", e))?;
        Ok(Self { signer })
    }

    pub fn from_signer(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

fn non_empty_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Loads one key per line. A missing file, an empty file or a malformed key
/// is an error: the batch must not start with a partial account list.
pub fn load_private_keys(path: impl AsRef<Path>) -> Result<Vec<Account>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read private keys from {}", path.display()))?;

    let accounts = non_empty_lines(&content)
        .map(|(line_no, line)| {
            Account::from_hex(line)
                .with_context(|| format!("{} line {}", path.display(), line_no))
        })
        .collect::<Result<Vec<_>>>()?;

    if accounts.is_empty() {
        return Err(anyhow::anyhow!(
            "No private keys found. Please check {}",
            path.display()
        ));
    }
    Ok(accounts)
}

/// Loads one proxy per line. A missing file means no proxies; malformed lines
/// are skipped with a warning.
pub fn load_proxies(path: impl AsRef<Path>) -> Vec<ProxyDescriptor> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("⚠️ No proxies loaded from {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    non_empty_lines(&content)
        .filter_map(|(line_no, line)| match line.parse::<ProxyDescriptor>() {
            Ok(proxy) => Some(proxy),
            Err(e) => {
                warn!("⚠️ Skipping proxy on {} line {}: {}", path.display(), line_no, e);
                None
            }
        })
        .collect()
}
