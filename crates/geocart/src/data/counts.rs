//! Category frequency tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Category;

/// Occurrence count per category, kept in first-occurrence order.
///
/// The order is what makes majority votes and split tie-breaks
/// deterministic, so it is preserved through serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCounts {
    entries: Vec<(Category, u64)>,
}

impl CategoryCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count categories from an iterator, in order of first appearance.
    pub fn tally<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = Category>,
    {
        let mut index: HashMap<Category, usize> = HashMap::new();
        let mut entries: Vec<(Category, u64)> = Vec::new();
        for category in categories {
            match index.get(&category) {
                Some(&slot) => entries[slot].1 += 1,
                None => {
                    index.insert(category.clone(), entries.len());
                    entries.push((category, 1));
                }
            }
        }
        Self { entries }
    }

    /// Number of distinct categories.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of counted rows.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// Count for one category (0 if never seen).
    pub fn get(&self, category: &Category) -> u64 {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map_or(0, |(_, n)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, u64)> + '_ {
        self.entries.iter().map(|(c, n)| (c, *n))
    }

    /// The most frequent category. Ties go to the one seen first.
    pub fn majority(&self) -> Option<&Category> {
        let mut best: Option<(&Category, u64)> = None;
        for (category, n) in self.iter() {
            if best.map_or(true, |(_, m)| n > m) {
                best = Some((category, n));
            }
        }
        best.map(|(c, _)| c)
    }

    /// Relative frequency of each category. Empty when nothing was counted.
    pub fn probabilities(&self) -> Vec<(&Category, f64)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        let total = total as f64;
        self.iter().map(|(c, n)| (c, n as f64 / total)).collect()
    }

    /// Gini impurity `1 - Σ p²` of the counted distribution.
    ///
    /// Returns `0.0` for an empty table and `0.0` exactly when a single
    /// category is present.
    pub fn gini(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let n = total as f64;
        let sum_sq: f64 = self
            .entries
            .iter()
            .map(|&(_, c)| {
                let p = c as f64 / n;
                p * p
            })
            .sum();
        1.0 - sum_sq
    }
}

impl FromIterator<Category> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self::tally(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn counts(labels: &[&str]) -> CategoryCounts {
        labels.iter().map(|&l| Category::from(l)).collect()
    }

    #[test]
    fn tally_keeps_first_occurrence_order() {
        let c = counts(&["b", "a", "b", "c", "a", "b"]);
        let order: Vec<_> = c.iter().map(|(c, n)| (c.to_string(), n)).collect();
        assert_eq!(
            order,
            vec![("b".to_string(), 3), ("a".to_string(), 2), ("c".to_string(), 1)]
        );
        assert_eq!(c.total(), 6);
        assert_eq!(c.get(&Category::from("z")), 0);
    }

    #[test]
    fn majority_tie_goes_to_first_seen() {
        let c = counts(&["no", "yes", "yes", "no"]);
        assert_eq!(c.majority(), Some(&Category::from("no")));
        assert_eq!(CategoryCounts::new().majority(), None);
    }

    #[test]
    fn gini_values() {
        assert_eq!(CategoryCounts::new().gini(), 0.0);
        assert_eq!(counts(&["a", "a", "a"]).gini(), 0.0);
        assert_abs_diff_eq!(counts(&["a", "a", "b", "b"]).gini(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(counts(&["a", "a", "a", "b"]).gini(), 0.375, epsilon = 1e-12);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let c = counts(&["a", "b", "b", "c"]);
        let total: f64 = c.probabilities().iter().map(|(_, p)| p).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
        assert!(CategoryCounts::new().probabilities().is_empty());
    }
}
