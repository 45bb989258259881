//! Bill of materials accumulator.
//!
//! A [`Bom`] maps a part id to the total quantity needed. Quantities are
//! fractional so that material amounts (metres of cable, grams of filament)
//! aggregate the same way as discrete parts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated part quantities for one instance of a brick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bom {
    entries: BTreeMap<String, f64>,
}

/// Zero means the document left the multiplicity unspecified.
fn normalize_quantity(quantity: f64) -> f64 {
    if quantity == 0.0 {
        1.0
    } else {
        quantity
    }
}

impl Bom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` of `part_id`, treating a zero quantity as one.
    pub fn add_part(&mut self, part_id: impl Into<String>, quantity: f64) {
        let quantity = normalize_quantity(quantity);
        *self.entries.entry(part_id.into()).or_insert(0.0) += quantity;
    }

    /// Folds `other` into this BOM, scaling every entry by `multiplier`.
    /// A zero multiplier is treated as one.
    pub fn add_bom(&mut self, other: &Bom, multiplier: f64) {
        let multiplier = normalize_quantity(multiplier);
        for (part_id, quantity) in &other.entries {
            self.add_part(part_id.as_str(), quantity * multiplier);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Accumulated quantity for a part, if it is present.
    pub fn quantity(&self, part_id: &str) -> Option<f64> {
        self.entries.get(part_id).copied()
    }

    /// Entries ordered by part id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(id, qty)| (id.as_str(), *qty))
    }

    pub fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a Bom {
    type Item = (&'a String, &'a f64);
    type IntoIter = std::collections::btree_map::Iter<'a, String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bom_is_empty() {
        let bom = Bom::new();
        assert!(bom.is_empty());
        assert_eq!(bom.len(), 0);
    }

    #[test]
    fn test_add_part_accumulates() {
        let mut bom = Bom::new();
        bom.add_part("M3_SCREW", 4.0);
        bom.add_part("M3_SCREW", 2.0);
        bom.add_part("M3_NUT", 1.5);

        assert!(!bom.is_empty());
        assert_eq!(bom.quantity("M3_SCREW"), Some(6.0));
        assert_eq!(bom.quantity("M3_NUT"), Some(1.5));
        assert_eq!(bom.quantity("WASHER"), None);
    }

    #[test]
    fn test_zero_quantity_counts_as_one() {
        let mut zero = Bom::new();
        zero.add_part("P", 0.0);

        let mut one = Bom::new();
        one.add_part("P", 1.0);

        assert_eq!(zero, one);
    }

    #[test]
    fn test_add_bom_scales_entries() {
        let mut sub = Bom::new();
        sub.add_part("Q", 5.0);
        sub.add_part("R", 0.5);

        let mut bom = Bom::new();
        bom.add_part("Q", 1.0);
        bom.add_bom(&sub, 3.0);

        assert_eq!(bom.quantity("Q"), Some(16.0));
        assert_eq!(bom.quantity("R"), Some(1.5));
    }

    #[test]
    fn test_add_bom_zero_multiplier_counts_as_one() {
        let mut sub = Bom::new();
        sub.add_part("Q", 5.0);

        let mut zero = Bom::new();
        zero.add_bom(&sub, 0.0);
        let mut one = Bom::new();
        one.add_bom(&sub, 1.0);

        assert_eq!(zero, one);
    }

    #[test]
    fn test_negative_quantities_are_not_rejected() {
        let mut bom = Bom::new();
        bom.add_part("P", 2.0);
        bom.add_part("P", -3.0);
        assert_eq!(bom.quantity("P"), Some(-1.0));
    }

    #[test]
    fn test_iteration_is_ordered_by_part_id() {
        let mut bom = Bom::new();
        bom.add_part("b", 1.0);
        bom.add_part("a", 2.0);

        let ids: Vec<&str> = bom.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut bom = Bom::new();
        bom.add_part("P", 3.0);
        let json = serde_json::to_string(&bom).unwrap();
        assert_eq!(json, r#"{"P":3.0}"#);
    }
}
