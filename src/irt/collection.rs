//! ItemCollection — an insertion-ordered, id-keyed test form.
//!
//! A form is a set of uniquely named items. Items present in two forms
//! under the same id are the common (anchor) items that drive linking;
//! every item of a form contributes to its test characteristic curve.
use std::collections::HashMap;

use crate::irt::{
    errors::{IrmError, IrmResult},
    models::traits::ItemResponseModel,
};

#[derive(Debug, Clone, Default)]
pub struct ItemCollection {
    ids: Vec<String>,
    items: Vec<Box<dyn ItemResponseModel>>,
    index: HashMap<String, usize>,
}

impl ItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item under `id`.
    ///
    /// # Errors
    /// [`IrmError::DuplicateItem`] when `id` is already present.
    pub fn insert<M: ItemResponseModel + 'static>(
        &mut self, id: impl Into<String>, item: M,
    ) -> IrmResult<()> {
        self.insert_boxed(id, Box::new(item))
    }

    /// # Errors
    /// [`IrmError::DuplicateItem`] when `id` is already present.
    pub fn insert_boxed(
        &mut self, id: impl Into<String>, item: Box<dyn ItemResponseModel>,
    ) -> IrmResult<()> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(IrmError::DuplicateItem { id });
        }
        self.index.insert(id.clone(), self.items.len());
        self.ids.push(id);
        self.items.push(item);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&dyn ItemResponseModel> {
        self.index.get(id).map(|&i| self.items[i].as_ref())
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn ItemResponseModel + 'static)> {
        self.index.get(id).map(|&i| self.items[i].as_mut())
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &(dyn ItemResponseModel + 'static))> {
        self.ids.iter().map(String::as_str).zip(self.items.iter().map(|b| b.as_ref()))
    }

    /// Ids present in both forms, in this form's order.
    pub fn common_ids(&self, other: &ItemCollection) -> Vec<String> {
        self.ids.iter().filter(|id| other.contains(id)).cloned().collect()
    }

    /// Test characteristic curve: the sum of expected item scores.
    pub fn tcc(&self, theta: f64) -> f64 {
        self.items.iter().map(|m| m.expected_value(theta)).sum()
    }

    pub fn tcc_deriv(&self, theta: f64) -> f64 {
        self.items.iter().map(|m| m.deriv_theta(theta)).sum()
    }

    pub fn tcc_deriv2(&self, theta: f64) -> f64 {
        self.items.iter().map(|m| m.deriv2_theta(theta)).sum()
    }

    pub fn test_information_at(&self, theta: f64) -> f64 {
        self.items.iter().map(|m| m.item_information_at(theta)).sum()
    }

    pub fn min_score(&self) -> f64 {
        self.items.iter().map(|m| m.min_score()).sum()
    }

    pub fn max_score(&self) -> f64 {
        self.items.iter().map(|m| m.max_score()).sum()
    }

    /// Limit of the TCC as θ → −∞ (sum of guessing floors).
    pub fn lower_asymptote_score(&self) -> f64 {
        self.items.iter().map(|m| m.lower_asymptote_score()).sum()
    }

    /// Limit of the TCC as θ → +∞.
    pub fn upper_asymptote_score(&self) -> f64 {
        self.items.iter().map(|m| m.upper_asymptote_score()).sum()
    }

    /// Apply `scale(intercept, slope)` to every item; fixed items stay put.
    ///
    /// # Errors
    /// `IrmError::NonFiniteParameter` for a zero or non-finite slope, or
    /// when any item would receive a non-finite parameter. Every item is
    /// checked before the first one is rescaled, so on error no item is
    /// changed.
    pub fn scale_all(&mut self, intercept: f64, slope: f64) -> IrmResult<()> {
        if !slope.is_finite() || slope == 0.0 || !intercept.is_finite() {
            return Err(IrmError::NonFiniteParameter { index: 0, value: slope });
        }
        for item in &self.items {
            item.check_scale(intercept, slope)?;
        }
        for item in self.items.iter_mut() {
            item.scale(intercept, slope)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irt::models::{Irm3PL, IrmGpcm};

    fn form(ids: &[&str]) -> ItemCollection {
        let mut c = ItemCollection::new();
        for (i, id) in ids.iter().enumerate() {
            let b = -1.0 + 0.5 * i as f64;
            c.insert(*id, Irm3PL::three_pl(1.0, b, 0.2, 1.7).expect("valid")).expect("unique");
        }
        c
    }

    #[test]
    // Purpose
    // -------
    // Duplicate ids are rejected and insertion order is preserved.
    fn insert_rejects_duplicates_and_keeps_order() {
        // Arrange
        let mut c = form(&["i3", "i1", "i2"]);

        // Act
        let err = c.insert("i1", Irm3PL::rasch(0.0, 1.0).expect("valid")).expect_err("duplicate");

        // Assert
        assert_eq!(err, IrmError::DuplicateItem { id: "i1".to_string() });
        assert_eq!(c.ids(), &["i3".to_string(), "i1".to_string(), "i2".to_string()]);
        assert_eq!(c.len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Common ids follow the calling form's order.
    fn common_ids_follow_this_forms_order() {
        let x = form(&["a", "b", "c", "d"]);
        let y = form(&["d", "x", "b"]);
        assert_eq!(x.common_ids(&y), vec!["b".to_string(), "d".to_string()]);
        assert_eq!(y.common_ids(&x), vec!["d".to_string(), "b".to_string()]);
    }

    #[test]
    // Purpose
    // -------
    // Form-level score bounds add item bounds, including polytomous weights.
    fn score_bounds_sum_item_bounds() {
        // Arrange
        let mut c = form(&["a", "b"]);
        c.insert("p", IrmGpcm::gpcm(1.0, 0.0, &[-0.5, 0.5], 1.7).expect("valid")).expect("unique");

        // Act / Assert
        assert_eq!(c.max_score(), 4.0);
        assert_eq!(c.min_score(), 0.0);
        approx::assert_abs_diff_eq!(c.lower_asymptote_score(), 0.4, epsilon = 1e-15);
        assert_eq!(c.upper_asymptote_score(), 4.0);
        approx::assert_abs_diff_eq!(c.tcc(40.0), 4.0, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // An invalid slope leaves every item unchanged.
    fn scale_all_rejects_zero_slope() {
        let mut c = form(&["a"]);
        let before = c.get("a").map(|m| m.item_parameters());
        assert!(c.scale_all(0.0, 0.0).is_err());
        assert_eq!(c.get("a").map(|m| m.item_parameters()), before);
    }

    #[test]
    // Purpose
    // -------
    // A transform that overflows a later item leaves earlier items intact.
    //
    // Given
    // -----
    // Items with difficulties 0.5 and 3.0, slope 1e308: the first maps to a
    // finite location, the second to +inf.
    //
    // Expect
    // ------
    // `scale_all` fails and neither item changes.
    fn scale_all_is_all_or_nothing() {
        // Arrange
        let mut c = ItemCollection::new();
        c.insert("ok", Irm3PL::two_pl(1.0, 0.5, 1.7).expect("valid")).expect("unique");
        c.insert("big", Irm3PL::two_pl(1.0, 3.0, 1.7).expect("valid")).expect("unique");
        let before: Vec<_> = c.iter().map(|(_, m)| m.item_parameters()).collect();

        // Act
        let result = c.scale_all(0.0, 1e308);

        // Assert
        assert!(matches!(result, Err(IrmError::NonFiniteParameter { index: 1, .. })));
        let after: Vec<_> = c.iter().map(|(_, m)| m.item_parameters()).collect();
        assert_eq!(after, before);
    }
}
