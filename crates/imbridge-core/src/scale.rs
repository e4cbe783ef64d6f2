//! UI scale and DPI policy.
//!
//! The effective scale is the base scale times an integer DPI factor. The DPI
//! factor is queried once and cached; it only changes through an explicit
//! [`ScaleState::recompute_dpi_factor`] call, never in the middle of a frame.

use crate::config::MIN_SCALE;

/// DPI of a display with one pixel per point.
pub const DPI_BASELINE: i32 = 96;

/// Pixels per point for a screen DPI, never below 1.
#[must_use]
pub fn dpi_factor_for(dpi: i32) -> i32 {
    (dpi / DPI_BASELINE).max(1)
}

/// Base scale, DPI policy, and the cached DPI factor.
#[derive(Debug, Clone)]
pub struct ScaleState {
    base: f32,
    scale_to_dpi: bool,
    dpi_factor: Option<i32>,
}

impl Default for ScaleState {
    fn default() -> Self {
        Self {
            base: 1.0,
            scale_to_dpi: true,
            dpi_factor: None,
        }
    }
}

impl ScaleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The base scale.
    pub fn base(&self) -> f32 {
        self.base
    }

    /// Sets the base scale.
    ///
    /// Returns true only if the value was accepted and differs from the
    /// current one. Values below [`MIN_SCALE`] and non-finite values are
    /// rejected.
    #[allow(clippy::float_cmp)]
    pub fn set_base(&mut self, value: f32) -> bool {
        if !value.is_finite() || value < MIN_SCALE || value == self.base {
            return false;
        }
        self.base = value;
        true
    }

    pub fn scale_to_dpi(&self) -> bool {
        self.scale_to_dpi
    }

    pub fn set_scale_to_dpi(&mut self, enabled: bool) {
        self.scale_to_dpi = enabled;
    }

    /// The DPI factor, querying `dpi` only if nothing is cached yet.
    pub fn dpi_factor(&mut self, dpi: impl FnOnce() -> i32) -> i32 {
        *self.dpi_factor.get_or_insert_with(|| dpi_factor_for(dpi()))
    }

    /// The cached DPI factor, or 1 if it was never queried.
    pub fn cached_dpi_factor(&self) -> i32 {
        self.dpi_factor.unwrap_or(1)
    }

    /// Replaces the cached DPI factor.
    pub fn recompute_dpi_factor(&mut self, dpi: i32) -> i32 {
        let factor = dpi_factor_for(dpi);
        self.dpi_factor = Some(factor);
        factor
    }

    /// Base scale times the cached DPI factor when DPI scaling is on.
    #[allow(clippy::cast_precision_loss)]
    pub fn effective(&self) -> f32 {
        if self.scale_to_dpi {
            self.base * self.cached_dpi_factor() as f32
        } else {
            self.base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_dpi_factor() {
        assert_eq!(dpi_factor_for(96), 1);
        assert_eq!(dpi_factor_for(192), 2);
        assert_eq!(dpi_factor_for(100), 1);
        assert_eq!(dpi_factor_for(0), 1);
    }

    #[test]
    fn test_set_base() {
        let mut state = ScaleState::new();
        assert!(state.set_base(0.25));
        assert!(!state.set_base(0.25));
        assert!(!state.set_base(0.2499));
        assert!((state.base() - 0.25).abs() < f32::EPSILON);
        assert!(!state.set_base(f32::NAN));
        assert!(!state.set_base(f32::INFINITY));
        assert!((state.base() - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_dpi_factor_cached() {
        let mut state = ScaleState::new();
        assert_eq!(state.dpi_factor(|| 192), 2);
        assert_eq!(state.dpi_factor(|| panic!("cached value expected")), 2);
        assert_eq!(state.recompute_dpi_factor(96), 1);
        assert_eq!(state.cached_dpi_factor(), 1);
    }

    #[test]
    fn test_effective_scale() {
        let mut state = ScaleState::new();
        state.set_base(1.5);
        state.recompute_dpi_factor(192);
        assert!((state.effective() - 3.0).abs() < f32::EPSILON);
        state.set_scale_to_dpi(false);
        assert!((state.effective() - 1.5).abs() < f32::EPSILON);
    }

    proptest! {
        #[test]
        fn dpi_factor_is_at_least_one(dpi in -1000i32..10_000) {
            let factor = dpi_factor_for(dpi);
            prop_assert!(factor >= 1);
            if dpi >= DPI_BASELINE {
                prop_assert_eq!(factor, dpi / DPI_BASELINE);
            }
        }
    }
}
