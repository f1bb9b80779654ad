use std::sync::Arc;

use super::alias_table::AliasTable;
use super::traits::Resolver;
use crate::models::{ResolutionSource, Symbol};

/// Resolves queries found in an [`AliasTable`].
#[derive(Clone, Debug)]
pub struct AliasResolver {
    table: Arc<AliasTable>,
}

impl AliasResolver {
    pub fn new(table: Arc<AliasTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &AliasTable {
        &self.table
    }
}

impl Resolver for AliasResolver {
    fn resolve(&self, normalized: &str, _trimmed: &str) -> Option<Symbol> {
        self.table.get(normalized).map(|entry| {
            Symbol::new(entry.ticker.clone(), ResolutionSource::AliasTable)
                .with_overrides(entry.provider_symbols.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_carries_overrides() {
        let resolver = AliasResolver::new(AliasTable::default_table());
        let symbol = resolver.resolve("byd", "BYD").unwrap();
        assert_eq!(symbol.ticker.as_ref(), "1211.HK");
        assert_eq!(symbol.source, ResolutionSource::AliasTable);
        assert_eq!(symbol.symbol_for("ALPHA_VANTAGE"), "HKG:1211");
    }

    #[test]
    fn test_miss() {
        let resolver = AliasResolver::new(AliasTable::default_table());
        assert!(resolver.resolve("acme widgets", "Acme Widgets").is_none());
    }
}
