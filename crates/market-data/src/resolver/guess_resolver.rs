use std::sync::Arc;

use super::traits::Resolver;
use crate::models::{ResolutionSource, Symbol};

const MAX_TICKER_LEN: usize = 15;

/// Whether `candidate` is shaped like an exchange ticker: 1-15 characters
/// from `A-Z 0-9 . - ^ = :` with at least one letter or digit.
pub fn looks_like_ticker(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.len() <= MAX_TICKER_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || ".-^=:".contains(c))
        && candidate.chars().any(|c| c.is_ascii_alphanumeric())
}

/// Treats the uppercased query as a ticker when it is shaped like one.
#[derive(Clone, Copy, Debug, Default)]
pub struct UppercaseGuessResolver;

impl UppercaseGuessResolver {
    /// The uppercased candidate, if it passes the shape check.
    pub fn candidate(trimmed: &str) -> Option<String> {
        let upper = trimmed.to_uppercase();
        looks_like_ticker(&upper).then_some(upper)
    }
}

impl Resolver for UppercaseGuessResolver {
    fn resolve(&self, _normalized: &str, trimmed: &str) -> Option<Symbol> {
        Self::candidate(trimmed)
            .map(|ticker| Symbol::new(Arc::<str>::from(ticker), ResolutionSource::Guess))
    }
}
