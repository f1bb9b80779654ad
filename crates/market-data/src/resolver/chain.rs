//! Resolver chain - composite resolver that tries resolvers in order.
//!
//! The resolver chain is the main entry point for symbol resolution. It
//! consults the alias table first and then applies the configured
//! [`ResolverPolicy`] to anything the table does not know.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use super::alias_resolver::AliasResolver;
use super::alias_table::{normalize, AliasTable};
use super::guess_resolver::UppercaseGuessResolver;
use super::traits::{Resolver, SymbolResolver, SymbolValidator};
use crate::errors::MarketDataError;
use crate::models::{ResolutionSource, ResolvedSymbol, Symbol};

/// What to do with a query the alias table does not know.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolverPolicy {
    /// Accept the uppercased query when it is shaped like a ticker.
    #[default]
    UppercaseGuess,
    /// Only alias-table hits resolve.
    Strict,
    /// Accept the uppercased guess only after a live lookup confirms it.
    /// Behaves as `Strict` when no validator is attached.
    Validate,
}

impl FromStr for ResolverPolicy {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guess" | "uppercase-guess" | "uppercase_guess" => Ok(Self::UppercaseGuess),
            "strict" => Ok(Self::Strict),
            "validate" => Ok(Self::Validate),
            other => Err(MarketDataError::InvalidInput {
                message: format!("Unknown resolver policy '{}'", other),
            }),
        }
    }
}

impl fmt::Display for ResolverPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UppercaseGuess => "guess",
            Self::Strict => "strict",
            Self::Validate => "validate",
        })
    }
}

/// Composite resolver.
///
/// The resolution order is:
/// 1. Alias table (exact, case-insensitive)
/// 2. Policy fallback (uppercase guess, optionally live-validated)
///
/// # Example
///
/// ```
/// use finagent_market_data::resolver::{ResolverChain, SymbolResolver};
///
/// let chain = ResolverChain::new();
/// let symbol = chain.lookup("  Nvidia ").unwrap();
/// assert_eq!(symbol.ticker.as_ref(), "NVDA");
/// ```
pub struct ResolverChain {
    alias: AliasResolver,
    policy: ResolverPolicy,
    validator: Option<Arc<dyn SymbolValidator>>,
}

impl ResolverChain {
    /// Chain over the default alias table with the `UppercaseGuess` policy.
    pub fn new() -> Self {
        Self::with_table(AliasTable::default_table())
    }

    pub fn with_table(table: Arc<AliasTable>) -> Self {
        Self {
            alias: AliasResolver::new(table),
            policy: ResolverPolicy::default(),
            validator: None,
        }
    }

    pub fn with_policy(mut self, policy: ResolverPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Attach the live lookup used by [`ResolverPolicy::Validate`].
    pub fn with_validator(mut self, validator: Arc<dyn SymbolValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn policy(&self) -> ResolverPolicy {
        self.policy
    }

    async fn fallback(&self, normalized: &str, trimmed: &str) -> Option<Symbol> {
        match self.policy {
            ResolverPolicy::Strict => None,
            ResolverPolicy::UppercaseGuess => UppercaseGuessResolver.resolve(normalized, trimmed),
            ResolverPolicy::Validate => {
                let validator = self.validator.as_ref()?;
                let candidate = UppercaseGuessResolver::candidate(trimmed)?;
                if validator.confirm(&candidate).await {
                    Some(Symbol::new(
                        Arc::<str>::from(candidate),
                        ResolutionSource::Validated,
                    ))
                } else {
                    debug!("Live lookup did not confirm '{}'", candidate);
                    None
                }
            }
        }
    }
}

impl Default for ResolverChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SymbolResolver for ResolverChain {
    async fn resolve(&self, query: &str) -> ResolvedSymbol {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return ResolvedSymbol::unresolved(query);
        }
        let normalized = normalize(trimmed);

        if let Some(symbol) = self.alias.resolve(&normalized, trimmed) {
            return ResolvedSymbol::Resolved(symbol);
        }

        match self.fallback(&normalized, trimmed).await {
            Some(symbol) => {
                debug!(
                    "Resolved '{}' to {} via {:?}",
                    trimmed, symbol.ticker, symbol.source
                );
                ResolvedSymbol::Resolved(symbol)
            }
            None => ResolvedSymbol::unresolved(query),
        }
    }

    fn lookup(&self, query: &str) -> Option<Symbol> {
        let trimmed = query.trim();
        self.alias.resolve(&normalize(trimmed), trimmed)
    }
}
