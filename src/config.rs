//! Sizing and growth policy for `HashTable`.

use crate::error::TableError;

/// Default bucket count. Prime, to spread typical string keys.
pub const DEFAULT_CAPACITY: usize = 101;

/// Default maximum `count / capacity` before a resize is attempted.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 4.5;

/// Default multiplier applied to the entry count to size a new bucket array.
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

/// Construction-time policy for a `HashTable`.
///
/// ```
/// use chained_hash::TableConfig;
///
/// let cfg = TableConfig::new().initial_capacity(7).max_load_factor(1.0);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub max_load_factor: f64,
    pub growth_factor: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn max_load_factor(mut self, lf: f64) -> Self {
        self.max_load_factor = lf;
        self
    }

    pub fn growth_factor(mut self, factor: usize) -> Self {
        self.growth_factor = factor;
        self
    }

    /// Reject configurations that would break `capacity > 0` or make the
    /// resize trigger meaningless.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.initial_capacity == 0 {
            return Err(TableError::InvalidConfig {
                reason: "initial_capacity must be > 0",
            });
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor <= 0.0 {
            return Err(TableError::InvalidConfig {
                reason: "max_load_factor must be finite and > 0",
            });
        }
        if self.growth_factor == 0 {
            return Err(TableError::InvalidConfig {
                reason: "growth_factor must be > 0",
            });
        }
        // A grown table sits at 1 / growth_factor; it must land under the limit.
        if self.max_load_factor * self.growth_factor as f64 <= 1.0 {
            return Err(TableError::InvalidConfig {
                reason: "max_load_factor * growth_factor must be > 1",
            });
        }
        Ok(())
    }

    /// Bucket count to grow to once `count` entries overflowed the threshold.
    pub(crate) fn grown_capacity(&self, count: usize) -> usize {
        count.saturating_mul(self.growth_factor).max(1)
    }
}
