//! Holdings

use rustc_hash::FxHashMap;

use crate::opportunities::OpportunityId;

/// Units held per opportunity. Only non-zero quantities are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Holdings {
    units: FxHashMap<OpportunityId, u32>,
}

impl Holdings {
    /// Create empty holdings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of an opportunity and return the new quantity.
    pub fn add_unit(&mut self, id: OpportunityId) -> u32 {
        let units = self.units.entry(id).or_insert(0);
        *units = units.saturating_add(1);
        *units
    }

    /// Units held of an opportunity.
    pub fn units(&self, id: OpportunityId) -> u32 {
        self.units.get(&id).copied().unwrap_or(0)
    }

    /// Iterate over held opportunities and their quantities, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (OpportunityId, u32)> + '_ {
        self.units.iter().map(|(id, units)| (*id, *units))
    }

    /// Total units across all opportunities.
    pub fn total_units(&self) -> u64 {
        self.units.values().map(|units| u64::from(*units)).sum()
    }

    /// Number of distinct opportunities held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_unit_accumulates() {
        let mut holdings = Holdings::new();

        assert_eq!(holdings.add_unit(OpportunityId(1)), 1);
        assert_eq!(holdings.add_unit(OpportunityId(1)), 2);
        assert_eq!(holdings.add_unit(OpportunityId(4)), 1);

        assert_eq!(holdings.units(OpportunityId(1)), 2);
        assert_eq!(holdings.units(OpportunityId(9)), 0);
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings.total_units(), 3);
    }

    #[test]
    fn new_holdings_are_empty() {
        assert!(Holdings::new().is_empty());
    }
}
