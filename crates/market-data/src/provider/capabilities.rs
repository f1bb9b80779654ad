//! Provider capabilities.
//!
//! Describes which operations a market data provider can serve, so the
//! aggregator can skip providers that cannot handle a request.

use std::fmt;

use serde::Serialize;

/// Operations the aggregator routes to providers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Quote,
    Snapshot,
    History,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Snapshot => "snapshot",
            Self::History => "history",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Describes the capabilities of a market data provider.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProviderCapabilities {
    /// Latest daily bar.
    pub supports_quote: bool,

    /// Point-in-time snapshot with valuation fields.
    pub supports_snapshot: bool,

    /// Daily/weekly bar series.
    pub supports_history: bool,
}

impl ProviderCapabilities {
    pub const ALL: Self = Self {
        supports_quote: true,
        supports_snapshot: true,
        supports_history: true,
    };

    pub fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::Quote => self.supports_quote,
            Operation::Snapshot => self.supports_snapshot,
            Operation::History => self.supports_history,
        }
    }
}
