//! Tolerances for point comparisons and layout validation.
//!
//! Policy
//! - Defaults are fixed constants; `ValidateCfg` only exists so tests and the
//!   CLI can tighten or loosen checks without touching call sites.

/// Two placed points closer than this are treated as the same point.
pub(crate) const COINCIDENT_EPS: f64 = 1e-9;
/// Triangle area (half cross-product norm) below this counts as collinear.
pub(crate) const COLLINEAR_EPS: f64 = 1e-9;
/// Point sets lying within this distance of one plane count as flat (zero volume).
pub(crate) const FLAT_EPS: f64 = 1e-9;
/// Wall-loop hand-off points must agree to within this distance (mm).
pub(crate) const CLOSURE_EPS: f64 = 1e-6;

/// Validation tolerances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidateCfg {
    pub eps_coincident: f64,
    pub eps_collinear: f64,
    pub eps_closure: f64,
}

impl Default for ValidateCfg {
    fn default() -> Self {
        Self {
            eps_coincident: COINCIDENT_EPS,
            eps_collinear: COLLINEAR_EPS,
            eps_closure: CLOSURE_EPS,
        }
    }
}
