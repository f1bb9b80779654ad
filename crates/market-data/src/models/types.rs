use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// Provider identifier - mostly static constants
pub type ProviderId = Cow<'static, str>;

/// Canonical ticker shared between the alias table and resolved symbols
pub type Ticker = Arc<str>;

/// Provider id -> provider-specific symbol (e.g. "ALPHA_VANTAGE" -> "HKG:1211")
pub type ProviderOverrides = HashMap<String, String>;
