//! Common-item (anchor) pairing between two forms.
use crate::irt::{collection::ItemCollection, models::traits::ItemResponseModel};

/// One common item as it appears in Form X and Form Y.
#[derive(Debug, Clone, Copy)]
pub struct AnchorPair<'a> {
    pub id: &'a str,
    pub x: &'a dyn ItemResponseModel,
    pub y: &'a dyn ItemResponseModel,
}

/// Pair items sharing an id, in Form X's order.
///
/// Items whose category counts differ between the forms cannot be compared
/// category by category and are dropped with a warning.
pub fn anchor_pairs<'a>(form_x: &'a ItemCollection, form_y: &'a ItemCollection) -> Vec<AnchorPair<'a>> {
    form_x
        .iter()
        .filter_map(|(id, x)| {
            let y = form_y.get(id)?;
            if x.ncat() != y.ncat() {
                tracing::warn!(
                    item = id,
                    ncat_x = x.ncat(),
                    ncat_y = y.ncat(),
                    "skipping common item with mismatched category counts"
                );
                return None;
            }
            Some(AnchorPair { id, x, y })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irt::models::{Irm3PL, IrmGpcm};

    #[test]
    // Purpose
    // -------
    // Only ids present in both forms with equal category counts are paired.
    fn pairs_skip_unique_and_mismatched_items() {
        // Arrange
        let mut x = ItemCollection::new();
        x.insert("a", Irm3PL::two_pl(1.0, 0.0, 1.7).expect("valid")).expect("unique");
        x.insert("b", Irm3PL::two_pl(1.0, 0.5, 1.7).expect("valid")).expect("unique");
        x.insert("only_x", Irm3PL::two_pl(1.0, 1.0, 1.7).expect("valid")).expect("unique");
        let mut y = ItemCollection::new();
        y.insert("b", Irm3PL::two_pl(1.2, 0.3, 1.7).expect("valid")).expect("unique");
        y.insert("a", IrmGpcm::gpcm(1.0, 0.0, &[-0.5, 0.5], 1.7).expect("valid")).expect("unique");

        // Act
        let pairs = anchor_pairs(&x, &y);

        // Assert
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].id, "b");
        assert_eq!(pairs[0].y.discrimination(), 1.2);
    }
}
