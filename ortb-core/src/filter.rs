//! Facet selections shared by the raw-data page and the CLI export.
//!
//! A [`FilterSpec`] is one value set per [`Facet`] plus an optional scale.
//! Facets combine conjunctively; inside a facet the test is set membership;
//! a facet with no selected value does not filter anything.

use crate::scale::Scale;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A filterable dimension of the observation table.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
pub enum Facet {
    /// Territorial code.
    Territory,
    Theme,
    /// Indicator display name.
    Indicator,
    /// ISO date ("YYYY-MM-DD").
    Date,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::Territory, Facet::Theme, Facet::Indicator, Facet::Date];

    /// Widget label for the facet's multiselect.
    pub fn prompt(&self, scale: Scale) -> &'static str {
        match (self, scale) {
            (Facet::Territory, Scale::Commune) => "Sélectionner les communes",
            (Facet::Territory, Scale::Epci) => "Sélectionner les EPCI",
            (Facet::Theme, _) => "Sélectionner les thématiques",
            (Facet::Indicator, _) => "Sélectionner les indicateurs",
            (Facet::Date, _) => "Sélectionner les dates",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub scale: Option<Scale>,
    selections: BTreeMap<Facet, BTreeSet<String>>,
}

impl FilterSpec {
    pub fn new(scale: Option<Scale>) -> Self {
        Self {
            scale,
            selections: BTreeMap::new(),
        }
    }

    /// Builder-style variant of [`FilterSpec::set`].
    pub fn with<I, S>(mut self, facet: Facet, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(facet, values);
        self
    }

    /// Replace the selection of one facet.
    pub fn set<I, S>(&mut self, facet: Facet, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.selections.remove(&facet);
        } else {
            self.selections.insert(facet, values);
        }
    }

    /// Add the value if absent, remove it otherwise.
    pub fn toggle(&mut self, facet: Facet, value: &str) {
        let set = self.selections.entry(facet).or_default();
        if !set.remove(value) {
            set.insert(value.to_string());
        }
        if set.is_empty() {
            self.selections.remove(&facet);
        }
    }

    pub fn clear(&mut self, facet: Facet) {
        self.selections.remove(&facet);
    }

    /// Drop every facet selection; the scale is kept.
    pub fn clear_all(&mut self) {
        self.selections.clear();
    }

    /// Selected values of a facet, empty when the facet is not filtered.
    pub fn selected(&self, facet: Facet) -> impl Iterator<Item = &str> {
        self.selections
            .get(&facet)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn is_selected(&self, facet: Facet, value: &str) -> bool {
        self.selections
            .get(&facet)
            .map(|set| set.contains(value))
            .unwrap_or(false)
    }

    pub fn selected_count(&self, facet: Facet) -> usize {
        self.selections.get(&facet).map(BTreeSet::len).unwrap_or(0)
    }

    /// Facets that actually restrict the result, with their value sets.
    pub fn active_facets(&self) -> impl Iterator<Item = (Facet, &BTreeSet<String>)> {
        self.selections
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(facet, values)| (*facet, values))
    }

    /// True when no facet has a selected value.
    pub fn is_empty(&self) -> bool {
        self.active_facets().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_spec_is_empty() {
        let spec = FilterSpec::new(Some(Scale::Commune));
        assert!(spec.is_empty());
        assert_eq!(spec.selected(Facet::Theme).count(), 0);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut spec = FilterSpec::new(None);
        spec.toggle(Facet::Indicator, "X");
        assert!(spec.is_selected(Facet::Indicator, "X"));
        assert!(!spec.is_empty());
        spec.toggle(Facet::Indicator, "X");
        assert!(!spec.is_selected(Facet::Indicator, "X"));
        assert!(spec.is_empty());
    }

    #[test]
    fn set_with_no_values_clears_the_facet() {
        let mut spec = FilterSpec::new(None).with(Facet::Date, ["2024-01-01"]);
        assert_eq!(spec.selected_count(Facet::Date), 1);
        spec.set(Facet::Date, Vec::<String>::new());
        assert!(spec.is_empty());
    }

    #[test]
    fn clear_all_keeps_scale() {
        let mut spec = FilterSpec::new(Some(Scale::Epci))
            .with(Facet::Theme, ["Mobilité"])
            .with(Facet::Territory, ["243500139"]);
        spec.clear_all();
        assert!(spec.is_empty());
        assert_eq!(spec.scale, Some(Scale::Epci));
    }

    #[test]
    fn active_facets_are_ordered() {
        let spec = FilterSpec::new(None)
            .with(Facet::Date, ["2024-01-01"])
            .with(Facet::Territory, ["35238"]);
        let facets: Vec<Facet> = spec.active_facets().map(|(f, _)| f).collect();
        assert_eq!(facets, vec![Facet::Territory, Facet::Date]);
    }
}
