//! Optimizer Configuration

use rust_decimal::Decimal;

/// Default annual market discount rate used to value financing (4.7%).
pub const DEFAULT_DISCOUNT_RATE: Decimal = Decimal::from_parts(47, 0, 0, false, 3);

/// Default maximum number of units that may be held of a single opportunity.
pub const DEFAULT_MAX_UNITS_PER_ITEM: u32 = 3;

/// Process-wide knobs threaded explicitly into every optimization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// Annual market discount rate as a fraction (0.047 = 4.7%)
    pub discount_rate: Decimal,

    /// Maximum units of a single opportunity in any portfolio
    pub max_units_per_item: u32,

    /// Optional cap on the number of search nodes visited.
    ///
    /// When exhausted, the search returns the best portfolio found so far and
    /// flags the result as possibly suboptimal.
    pub node_limit: Option<u64>,
}

impl OptimizerConfig {
    /// Replace the discount rate.
    #[must_use]
    pub const fn with_discount_rate(mut self, discount_rate: Decimal) -> Self {
        self.discount_rate = discount_rate;
        self
    }

    /// Replace the per-opportunity unit cap.
    #[must_use]
    pub const fn with_max_units_per_item(mut self, max_units_per_item: u32) -> Self {
        self.max_units_per_item = max_units_per_item;
        self
    }

    /// Set a node-visit budget for the search.
    #[must_use]
    pub const fn with_node_limit(mut self, node_limit: u64) -> Self {
        self.node_limit = Some(node_limit);
        self
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            discount_rate: DEFAULT_DISCOUNT_RATE,
            max_units_per_item: DEFAULT_MAX_UNITS_PER_ITEM,
            node_limit: None,
        }
    }
}
