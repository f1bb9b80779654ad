//! Curated mapping from common company and index names to tickers.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::models::{ProviderOverrides, Ticker};

/// A table entry: the canonical ticker plus provider-specific spellings.
#[derive(Clone, Debug, PartialEq)]
pub struct AliasEntry {
    pub ticker: Ticker,
    pub provider_symbols: ProviderOverrides,
}

impl AliasEntry {
    pub fn new(ticker: &str) -> Self {
        Self {
            ticker: Arc::from(ticker),
            provider_symbols: ProviderOverrides::new(),
        }
    }

    pub fn with_provider_symbol(mut self, provider: &str, symbol: &str) -> Self {
        self.provider_symbols
            .insert(provider.to_string(), symbol.to_string());
        self
    }
}

/// Immutable lowercase-key -> entry map.
///
/// Keys are normalized (trimmed, lowercased) on insertion, and lookups
/// normalize the same way, so matching is case- and whitespace-insensitive.
#[derive(Clone, Debug, Default)]
pub struct AliasTable {
    entries: HashMap<String, AliasEntry>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(alias, ticker)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::new(), |table, (alias, ticker)| {
                table.with_entry(alias, AliasEntry::new(ticker))
            })
    }

    pub fn with_entry(mut self, alias: &str, entry: AliasEntry) -> Self {
        self.entries.insert(normalize(alias), entry);
        self
    }

    pub fn get(&self, query: &str) -> Option<&AliasEntry> {
        self.entries.get(&normalize(query))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The process-wide default table.
    pub fn default_table() -> Arc<AliasTable> {
        DEFAULT_ALIASES.clone()
    }
}

pub(crate) fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

const DEFAULT_PAIRS: &[(&str, &str)] = &[
    ("nvidia", "NVDA"),
    ("apple", "AAPL"),
    ("microsoft", "MSFT"),
    ("google", "GOOGL"),
    ("tesla", "TSLA"),
    ("meta", "META"),
    ("amazon", "AMZN"),
    ("oracle", "ORCL"),
    ("netflix", "NFLX"),
    ("ibm", "IBM"),
    ("servicenow", "NOW"),
    ("s&p", "^GSPC"),
    ("nasdaq", "^IXIC"),
    ("dow jones", "^DJI"),
    ("toyota", "TM"),
    ("samsung", "005930.KQ"),
    ("sony", "SONY"),
    ("intel", "INTC"),
    ("qualcomm", "QCOM"),
    ("cisco", "CSCO"),
    ("paypal", "PYPL"),
];

lazy_static! {
    static ref DEFAULT_ALIASES: Arc<AliasTable> = Arc::new(
        AliasTable::from_pairs(DEFAULT_PAIRS.iter().copied())
            .with_entry(
                "byd",
                AliasEntry::new("1211.HK").with_provider_symbol("ALPHA_VANTAGE", "HKG:1211"),
            )
            .with_entry(
                "hyundai",
                AliasEntry::new("005380.KS")
                    .with_provider_symbol("FINNHUB", "005380.KQ")
                    .with_provider_symbol("ALPHA_VANTAGE", "KRX:005380"),
            )
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_contents() {
        let table = AliasTable::default_table();
        assert_eq!(table.len(), 23);
        assert_eq!(table.get("nvidia").unwrap().ticker.as_ref(), "NVDA");
        assert_eq!(table.get("Dow Jones").unwrap().ticker.as_ref(), "^DJI");
    }

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        let table = AliasTable::default_table();
        for (alias, ticker) in DEFAULT_PAIRS {
            let padded = format!("  {}\t", alias.to_uppercase());
            assert_eq!(
                table.get(&padded).map(|e| e.ticker.as_ref()),
                Some(*ticker),
                "alias {}",
                alias
            );
        }
    }

    #[test]
    fn test_provider_symbols() {
        let table = AliasTable::default_table();
        let hyundai = table.get("hyundai").unwrap();
        assert_eq!(hyundai.ticker.as_ref(), "005380.KS");
        assert_eq!(
            hyundai.provider_symbols.get("ALPHA_VANTAGE").map(String::as_str),
            Some("KRX:005380")
        );
    }

    #[test]
    fn test_custom_table() {
        let table = AliasTable::from_pairs([("acme", "ACME")]);
        assert_eq!(table.get("ACME ").unwrap().ticker.as_ref(), "ACME");
        assert!(table.get("nvidia").is_none());
    }
}
