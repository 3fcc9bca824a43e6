//! The price-ratio collaborator seam.
//!
//! The engine never fetches prices; a host-owned source supplies them on
//! its own schedule. A missing, zero, or stale quote surfaces as
//! "ratio unavailable" at the controller boundary.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A price quote: units of the quote currency per one unit of the base
/// currency, as a decimal string, stamped with when it was observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuote {
    /// The price as a decimal string.
    pub rate: String,
    /// When this quote was produced.
    pub quoted_at: DateTime<Utc>,
}

impl RateQuote {
    /// Create a quote stamped now.
    pub fn new(rate: impl Into<String>) -> Self {
        Self {
            rate: rate.into(),
            quoted_at: Utc::now(),
        }
    }

    /// Age of the quote.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.quoted_at)
    }
}

/// A synchronous source of price quotes.
pub trait RateSource: Send + Sync {
    /// The price of one `base` unit in `quote` units, if known.
    fn price(&self, base: &str, quote: &str) -> Option<RateQuote>;
}

/// In-memory rate table. The host's refresh thread inserts quotes while
/// the input session reads them.
pub struct RateTable {
    rates: DashMap<String, RateQuote>,
    max_age: Option<Duration>,
}

impl RateTable {
    /// Create a table whose quotes never go stale.
    pub fn new() -> Self {
        Self {
            rates: DashMap::new(),
            max_age: None,
        }
    }

    /// Create a table that treats quotes older than `max_age` as missing.
    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            rates: DashMap::new(),
            max_age: Some(max_age),
        }
    }

    /// Insert or replace the quote for a pair.
    pub fn insert(&self, base: &str, quote: &str, rate: impl Into<String>) {
        self.rates.insert(Self::key(base, quote), RateQuote::new(rate));
    }

    /// Insert a pre-stamped quote.
    pub fn insert_quote(&self, base: &str, quote: &str, rate_quote: RateQuote) {
        self.rates.insert(Self::key(base, quote), rate_quote);
    }

    /// Remove the quote for a pair.
    pub fn remove(&self, base: &str, quote: &str) {
        self.rates.remove(&Self::key(base, quote));
    }

    /// Drop all quotes.
    pub fn clear(&self) {
        self.rates.clear();
    }

    /// Number of stored quotes.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether the table holds no quotes.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    fn key(base: &str, quote: &str) -> String {
        format!("{base}_{quote}")
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RateSource for RateTable {
    fn price(&self, base: &str, quote: &str) -> Option<RateQuote> {
        let key = Self::key(base, quote);
        if let Some(entry) = self.rates.get(&key) {
            match self.max_age {
                Some(max_age) if entry.age() > max_age => {
                    debug!(pair = %key, "Quote stale");
                    drop(entry);
                    self.rates.remove(&key);
                    None
                }
                _ => {
                    debug!(pair = %key, "Quote hit");
                    Some(entry.clone())
                }
            }
        } else {
            debug!(pair = %key, "Quote miss");
            None
        }
    }
}
