//! Symbol resolution: free text to canonical ticker.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     ResolverChain                         │
//! │                                                           │
//! │  ┌─────────────────────────────────────────────────────┐ │
//! │  │ 1. Alias Resolver (AliasTable)                       │ │
//! │  │    - "  Nvidia " -> NVDA                             │ │
//! │  │    - carries provider-specific spellings             │ │
//! │  └─────────────────────────────────────────────────────┘ │
//! │                         │ miss                            │
//! │                         ▼                                 │
//! │  ┌─────────────────────────────────────────────────────┐ │
//! │  │ 2. Policy fallback (ResolverPolicy)                  │ │
//! │  │    - UppercaseGuess: "pltr" -> PLTR                  │ │
//! │  │    - Validate: guess confirmed by SymbolValidator    │ │
//! │  │    - Strict: nothing                                 │ │
//! │  └─────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Anything left over is `ResolvedSymbol::Unresolved`, which the aggregator
//! rejects before any provider is called.

mod alias_resolver;
mod alias_table;
mod chain;
mod guess_resolver;
mod traits;

pub use alias_resolver::AliasResolver;
pub use alias_table::{AliasEntry, AliasTable};
pub use chain::{ResolverChain, ResolverPolicy};
pub use guess_resolver::{looks_like_ticker, UppercaseGuessResolver};
pub use traits::{Resolver, SymbolResolver, SymbolValidator};
