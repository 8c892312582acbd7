//! Per-layer display layout and the level-of-detail gate.
//!
//! The gate is a pass/suppress decision for full rendering, kept separate
//! from the style dispatch loop so the decimation policy can change
//! without touching it. The policy is explicit configuration; nothing here
//! infers thresholds from data.

/// Level-of-detail decimation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LodPolicy {
    /// Every level renders fully.
    Always,
    /// Exactly one level renders; everything else is suppressed.
    ExactLevel(u8),
    /// Levels at or above the threshold render.
    MinLevel(u8),
}

/// Per-layer display configuration controlling level-of-detail behavior.
///
/// Set once at layer configuration time, read-only thereafter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureDisplayLayout {
    tile_size_factor: f64,
    policy: LodPolicy,
}

impl FeatureDisplayLayout {
    /// Create a layout with the given tile size factor and an `Always`
    /// policy.
    pub fn new(tile_size_factor: f64) -> Self {
        Self {
            tile_size_factor,
            policy: LodPolicy::Always,
        }
    }

    /// Set the decimation policy.
    pub fn with_policy(mut self, policy: LodPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Tile size factor, available to rasterizers that scale symbology by
    /// tile density.
    pub fn tile_size_factor(&self) -> f64 {
        self.tile_size_factor
    }

    /// Configured decimation policy.
    pub fn policy(&self) -> LodPolicy {
        self.policy
    }

    /// Pass/suppress decision for full rendering at `level`.
    pub fn allows_level(&self, level: u8) -> bool {
        match self.policy {
            LodPolicy::Always => true,
            LodPolicy::ExactLevel(l) => level == l,
            LodPolicy::MinLevel(min) => level >= min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_allows_everything() {
        let layout = FeatureDisplayLayout::new(15.0);
        assert!(layout.allows_level(0));
        assert!(layout.allows_level(4));
        assert!(layout.allows_level(22));
    }

    #[test]
    fn test_exact_level() {
        let layout = FeatureDisplayLayout::new(15.0).with_policy(LodPolicy::ExactLevel(4));
        assert!(layout.allows_level(4));
        assert!(!layout.allows_level(3));
        assert!(!layout.allows_level(5));
    }

    #[test]
    fn test_min_level() {
        let layout = FeatureDisplayLayout::new(15.0).with_policy(LodPolicy::MinLevel(6));
        assert!(!layout.allows_level(5));
        assert!(layout.allows_level(6));
        assert!(layout.allows_level(12));
    }

    #[test]
    fn test_tile_size_factor_accessor() {
        let layout = FeatureDisplayLayout::new(7.5);
        assert_eq!(layout.tile_size_factor(), 7.5);
        assert_eq!(layout.policy(), LodPolicy::Always);
    }
}
