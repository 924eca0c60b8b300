// src/matrix/reconcile.rs - Merging generated cells with the working set

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::matrix::{Combination, VariationKey};
use crate::model::Variation;
use crate::types::ClientId;

/// Result of reconciling generated matrix cells against the variations the
/// merchant already has.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// The new working list: one variation per generated cell, in generation
    /// order, followed by stale rows pending discard.
    pub working: Vec<Variation>,
    /// Existing variations whose identity matched a generated cell. Carried
    /// over byte-identical, client id included.
    pub retained: Vec<ClientId>,
    /// Freshly synthesized variations with no existing counterpart.
    pub created: Vec<ClientId>,
    /// Existing variations whose identity no longer appears in the matrix.
    /// They stay in the working list until the merchant confirms discarding
    /// them; reconciliation never drops a row on its own.
    pub stale: Vec<ClientId>,
}

/// Builds the post-apply working list from the generated cells and the
/// current variations.
///
/// Matching is by [`VariationKey`]. When several existing variations share an
/// identity, the first in list order wins and the rest are treated as stale.
/// Applying the same cells twice is a no-op: every row retained, nothing
/// created, nothing stale.
pub fn reconcile(cells: &[Combination], existing: &[Variation]) -> Reconciliation {
    let mut by_key: HashMap<VariationKey, &Variation> = HashMap::new();
    for variation in existing {
        by_key.entry(VariationKey::of(variation)).or_insert(variation);
    }

    let mut result = Reconciliation::default();
    let mut used: HashSet<ClientId> = HashSet::new();

    for cell in cells {
        match by_key.get(&cell.identity()) {
            Some(found) if !used.contains(&found.client_id) => {
                used.insert(found.client_id);
                result.retained.push(found.client_id);
                result.working.push((*found).clone());
            }
            _ => {
                let fresh = cell.clone().into_variation();
                result.created.push(fresh.client_id);
                result.working.push(fresh);
            }
        }
    }

    for variation in existing {
        if !used.contains(&variation.client_id) {
            result.stale.push(variation.client_id);
            result.working.push(variation.clone());
        }
    }

    debug!(
        retained = result.retained.len(),
        created = result.created.len(),
        stale = result.stale.len(),
        "Reconciled variation matrix"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{cross_product, DimensionKind, OptionDimension};

    fn dims(colors: &[&str], sizes: &[&str]) -> Vec<OptionDimension> {
        vec![
            OptionDimension::new(
                DimensionKind::LegacyColor,
                colors.iter().map(|v| (*v).to_string()).collect(),
            ),
            OptionDimension::new(
                DimensionKind::LegacySize,
                sizes.iter().map(|v| (*v).to_string()).collect(),
            ),
        ]
    }

    #[test]
    fn test_fresh_matrix_creates_every_cell() {
        let cells = cross_product(&dims(&["Red", "Blue"], &["S", "M"]));
        let result = reconcile(&cells, &[]);

        assert_eq!(result.working.len(), 4);
        assert_eq!(result.created.len(), 4);
        assert!(result.retained.is_empty());
        assert!(result.stale.is_empty());
    }

    #[test]
    fn test_adding_a_value_keeps_existing_rows() {
        use rust_decimal::Decimal;

        let cells = cross_product(&dims(&["Red", "Blue"], &["S", "M"]));
        let first = reconcile(&cells, &[]);

        let mut edited = first.working.clone();
        edited[0].sku = Some("RED-S".to_string());
        edited[0].price = Some(Decimal::new(1299, 2));
        edited[0].set_inventory("standard", 25);
        edited[0].image = Some(crate::model::ImageRef {
            id: Some(7),
            url: "https://img.example/red-s.jpg".to_string(),
            is_clean_image: false,
        });

        let grown = cross_product(&dims(&["Red", "Blue"], &["S", "M", "L"]));
        let second = reconcile(&grown, &edited);

        assert_eq!(second.working.len(), 6);
        assert_eq!(second.retained.len(), 4);
        assert_eq!(second.created.len(), 2);
        assert!(second.stale.is_empty());
        // Red/S carried over untouched: client id, sku, price, inventory,
        // and image all survive the re-apply.
        assert_eq!(second.working[0], edited[0]);
        assert_eq!(second.working[0].sku.as_deref(), Some("RED-S"));
        assert_eq!(second.working[0].price, Some(Decimal::new(1299, 2)));
        assert_eq!(second.working[0].inventory_for("standard"), Some(25));
        assert_eq!(
            second.working[0].image.as_ref().map(|i| i.url.as_str()),
            Some("https://img.example/red-s.jpg")
        );
        assert_eq!(second.working[0].client_id, edited[0].client_id);
    }

    #[test]
    fn test_removing_a_value_flags_stale_but_keeps_rows() {
        let cells = cross_product(&dims(&["Red", "Blue"], &["S", "M"]));
        let first = reconcile(&cells, &[]);

        let shrunk = cross_product(&dims(&["Red"], &["S", "M"]));
        let second = reconcile(&shrunk, &first.working);

        assert_eq!(second.retained.len(), 2);
        assert_eq!(second.stale.len(), 2);
        assert!(second.created.is_empty());
        // Stale rows remain in the working list, appended after the matrix.
        assert_eq!(second.working.len(), 4);
        assert_eq!(second.working[2].color.as_deref(), Some("Blue"));
        assert_eq!(second.working[3].color.as_deref(), Some("Blue"));
    }

    #[test]
    fn test_reapply_is_idempotent() {
        let cells = cross_product(&dims(&["Red", "Blue"], &["S"]));
        let first = reconcile(&cells, &[]);
        let second = reconcile(&cells, &first.working);

        assert_eq!(second.retained.len(), 2);
        assert!(second.created.is_empty());
        assert!(second.stale.is_empty());
        assert_eq!(
            second.working.iter().map(|v| v.client_id).collect::<Vec<_>>(),
            first.working.iter().map(|v| v.client_id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_duplicate_identities_first_wins() {
        let cells = cross_product(&dims(&["Red"], &["S"]));
        let a = Variation::from_selections(Some("Red".into()), Some("S".into()), None);
        let b = Variation::from_selections(Some("Red".into()), Some("S".into()), None);
        let result = reconcile(&cells, &[a.clone(), b.clone()]);

        assert_eq!(result.retained, vec![a.client_id]);
        assert_eq!(result.stale, vec![b.client_id]);
        assert!(result.created.is_empty());
        assert_eq!(result.working.len(), 2);
    }

    #[test]
    fn test_no_cells_marks_everything_stale() {
        let a = Variation::from_selections(Some("Red".into()), None, None);
        let result = reconcile(&[], &[a.clone()]);

        assert!(result.retained.is_empty());
        assert!(result.created.is_empty());
        assert_eq!(result.stale, vec![a.client_id]);
        assert_eq!(result.working.len(), 1);
    }
}
