//! Wallet address type with `0x` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypeError;

/// An account address as reported by the wallet SDK, always prefixed with `0x`.
///
/// The original casing is preserved for display and persistence. Account
/// comparisons go through [`WalletAddress::same_account`], which ignores case
/// so that checksummed and lowercase renderings of one account match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// The standard prefix for all account addresses.
    pub const PREFIX: &'static str = "0x";

    /// Parse an address, requiring the `0x` prefix followed by hex digits.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
        let s = raw.into();
        let body = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| TypeError::InvalidAddress(s.clone()))?;
        if body.is_empty() || !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidAddress(s));
        }
        Ok(Self(s))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `other` names the same account, ignoring hex case.
    pub fn same_account(&self, other: &WalletAddress) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WalletAddress {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<WalletAddress> for String {
    fn from(addr: WalletAddress) -> Self {
        addr.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefixed_hex() {
        let addr = WalletAddress::parse("0xABC").unwrap();
        assert_eq!(addr.as_str(), "0xABC");
    }

    #[test]
    fn rejects_missing_prefix_and_non_hex() {
        assert!(WalletAddress::parse("ABC").is_err());
        assert!(WalletAddress::parse("0x").is_err());
        assert!(WalletAddress::parse("0xZZ").is_err());
    }

    #[test]
    fn same_account_ignores_case() {
        let upper = WalletAddress::parse("0xABCDEF").unwrap();
        let lower = WalletAddress::parse("0xabcdef").unwrap();
        let other = WalletAddress::parse("0xDEF").unwrap();
        assert!(upper.same_account(&lower));
        assert!(!upper.same_account(&other));
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<WalletAddress, _> = serde_json::from_str("\"0x12ab\"");
        assert!(ok.is_ok());
        let bad: Result<WalletAddress, _> = serde_json::from_str("\"abc123\"");
        assert!(bad.is_err());
    }
}
