//! Inclusion Constraints

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::opportunities::OpportunityId;

/// Per-opportunity override of the optimizer's choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Let the optimizer decide
    #[default]
    #[serde(alias = "auto")]
    Automatic,

    /// Buy at least one unit if the budget allows
    #[serde(alias = "force")]
    ForceInclude,

    /// Never buy this opportunity
    #[serde(alias = "exclude")]
    ForceExclude,
}

/// Constraints keyed by opportunity; missing entries are [`Constraint::Automatic`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintMap {
    constraints: FxHashMap<OpportunityId, Constraint>,
}

impl ConstraintMap {
    /// Create an empty constraint map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the constraint for an opportunity, returning the map for chaining.
    #[must_use]
    pub fn with(mut self, id: impl Into<OpportunityId>, constraint: Constraint) -> Self {
        self.set(id, constraint);
        self
    }

    /// Set the constraint for an opportunity.
    ///
    /// Setting [`Constraint::Automatic`] removes any existing override.
    pub fn set(&mut self, id: impl Into<OpportunityId>, constraint: Constraint) {
        let id = id.into();

        if constraint == Constraint::Automatic {
            self.constraints.remove(&id);
        } else {
            self.constraints.insert(id, constraint);
        }
    }

    /// Constraint applying to an opportunity.
    pub fn get(&self, id: OpportunityId) -> Constraint {
        self.constraints.get(&id).copied().unwrap_or_default()
    }

    /// Iterate over the explicit overrides.
    pub fn iter(&self) -> impl Iterator<Item = (OpportunityId, Constraint)> + '_ {
        self.constraints.iter().map(|(id, constraint)| (*id, *constraint))
    }

    /// Number of explicit overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Check if there are no overrides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl FromIterator<(OpportunityId, Constraint)> for ConstraintMap {
    fn from_iter<I: IntoIterator<Item = (OpportunityId, Constraint)>>(iter: I) -> Self {
        let mut map = ConstraintMap::new();

        for (id, constraint) in iter {
            map.set(id, constraint);
        }

        map
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_entries_are_automatic() {
        let map = ConstraintMap::new();

        assert_eq!(map.get(OpportunityId(1)), Constraint::Automatic);
        assert!(map.is_empty());
    }

    #[test]
    fn set_automatic_removes_override() {
        let mut map = ConstraintMap::new().with(1, Constraint::ForceExclude);

        assert_eq!(map.len(), 1);

        map.set(1, Constraint::Automatic);

        assert!(map.is_empty());
    }

    #[test]
    fn collects_from_pairs() {
        let map: ConstraintMap = [
            (OpportunityId(1), Constraint::ForceInclude),
            (OpportunityId(2), Constraint::ForceExclude),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.get(OpportunityId(1)), Constraint::ForceInclude);
        assert_eq!(map.get(OpportunityId(2)), Constraint::ForceExclude);
    }

    #[test]
    fn deserializes_short_and_long_names() -> TestResult {
        let parsed: Vec<Constraint> =
            serde_norway::from_str("[auto, force, exclude, force_include, force_exclude]")?;

        assert_eq!(
            parsed,
            vec![
                Constraint::Automatic,
                Constraint::ForceInclude,
                Constraint::ForceExclude,
                Constraint::ForceInclude,
                Constraint::ForceExclude,
            ]
        );

        Ok(())
    }
}
