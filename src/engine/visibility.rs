//! # Visibility Resolver
//!
//! Combines a layer's `is_visible` flag with per-feature overrides.
//! A feature without an override is visible by default; a hidden layer
//! hides every feature on the map, whatever its override says.

use std::collections::HashMap;

use crate::catalog::FeatureOverride;

/// Override table of one layer, `feature index -> visible`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSet {
    by_index: HashMap<usize, bool>,
}

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = FeatureOverride>,
    {
        Self {
            by_index: overrides
                .into_iter()
                .map(|o| (o.feature_index, o.is_visible))
                .collect(),
        }
    }

    /// The feature's own visibility: its override, or `true`
    pub fn feature_visible(&self, index: usize) -> bool {
        self.by_index.get(&index).copied().unwrap_or(true)
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}

impl FromIterator<(usize, bool)> for OverrideSet {
    fn from_iter<T: IntoIterator<Item = (usize, bool)>>(iter: T) -> Self {
        Self {
            by_index: iter.into_iter().collect(),
        }
    }
}

/// Visibility of one feature as seen by the map and by the layer control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureVisibility {
    /// Override value alone; what the layer-control list shows
    pub feature: bool,
    /// Override AND layer flag; whether the map renders the feature
    pub effective: bool,
}

/// Effective visibility: `override AND layer`
pub fn effective_visibility(feature_visible: bool, layer_visible: bool) -> bool {
    feature_visible && layer_visible
}

/// Resolver bound to one layer
#[derive(Debug, Clone, Copy)]
pub struct VisibilityResolver<'a> {
    layer_visible: bool,
    overrides: &'a OverrideSet,
}

impl<'a> VisibilityResolver<'a> {
    pub fn new(layer_visible: bool, overrides: &'a OverrideSet) -> Self {
        Self {
            layer_visible,
            overrides,
        }
    }

    pub fn resolve(&self, index: usize) -> FeatureVisibility {
        let feature = self.overrides.feature_visible(index);
        FeatureVisibility {
            feature,
            effective: effective_visibility(feature, self.layer_visible),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LayerId;

    #[test]
    fn test_truth_table() {
        assert!(effective_visibility(true, true));
        assert!(!effective_visibility(false, true));
        assert!(!effective_visibility(true, false));
        assert!(!effective_visibility(false, false));
    }

    #[test]
    fn test_missing_override_defaults_visible() {
        let overrides = OverrideSet::new();
        let resolver = VisibilityResolver::new(true, &overrides);
        assert_eq!(
            resolver.resolve(99),
            FeatureVisibility { feature: true, effective: true }
        );
    }

    #[test]
    fn test_hidden_layer_masks_every_feature() {
        let overrides: OverrideSet = [(0, true), (1, false)].into_iter().collect();
        let resolver = VisibilityResolver::new(false, &overrides);

        for index in 0..4 {
            assert!(!resolver.resolve(index).effective);
        }
        // The per-feature value is still reported for the layer control
        assert!(resolver.resolve(0).feature);
        assert!(!resolver.resolve(1).feature);
        assert!(resolver.resolve(2).feature);
    }

    #[test]
    fn test_from_overrides() {
        let layer = LayerId::new(1);
        let set = OverrideSet::from_overrides(vec![
            FeatureOverride::new(layer, 0, false),
            FeatureOverride::new(layer, 3, true),
        ]);
        assert_eq!(set.len(), 2);
        assert!(!set.feature_visible(0));
        assert!(set.feature_visible(1));
        assert!(set.feature_visible(3));
    }
}
