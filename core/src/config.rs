//! Import configuration.
//!
//! [`ImportConfig`] is owned by one parser instance. The coordinate basis and
//! unit scale are plain data so hosts with other engine conventions can plug
//! in their own.

use crate::math::{BasisConversion, Mat4};

/// Default uniform scale: glTF meters to engine centimeters.
pub const DEFAULT_SCALE: f32 = 100.0;

/// Default symmetric bounds pad, as a fraction of the box extent.
pub const DEFAULT_BOUNDS_MARGIN: f32 = 0.1;

/// Default extra pad on the vertical (Z) axis.
pub const DEFAULT_BOUNDS_VERTICAL_MARGIN: f32 = 0.1;

/// Change of basis from glTF (Y-up, right-handed) to a Z-up engine frame:
/// `(x, y, z)` maps to `(-z, x, y)`.
pub fn default_basis() -> Mat4 {
    #[rustfmt::skip]
    let basis = Mat4::new(
        0.0, 0.0, -1.0, 0.0,
        1.0, 0.0,  0.0, 0.0,
        0.0, 1.0,  0.0, 0.0,
        0.0, 0.0,  0.0, 1.0,
    );
    basis
}

/// Settings applied while decoding one document.
///
/// # Example
///
/// ```ignore
/// use redlilium_gltf::config::ImportConfig;
///
/// let config = ImportConfig::identity().with_scale(2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportConfig {
    /// Change-of-basis matrix (column-vector convention) from source to
    /// engine coordinates. Must be invertible.
    pub basis: Mat4,
    /// Uniform scale applied to positions and translations.
    pub scale: f32,
    /// Pad added on both sides of every axis of mesh bounds, as a fraction
    /// of the axis extent.
    pub bounds_margin: f32,
    /// Additional pad on the top of the vertical (Z) axis.
    pub bounds_vertical_margin: f32,
}

impl ImportConfig {
    /// Default engine conventions (see [`default_basis`], [`DEFAULT_SCALE`]).
    pub fn new() -> Self {
        Self {
            basis: default_basis(),
            scale: DEFAULT_SCALE,
            bounds_margin: DEFAULT_BOUNDS_MARGIN,
            bounds_vertical_margin: DEFAULT_BOUNDS_VERTICAL_MARGIN,
        }
    }

    /// Identity basis and unit scale; the document's coordinates pass
    /// through unchanged.
    pub fn identity() -> Self {
        Self {
            basis: Mat4::identity(),
            scale: 1.0,
            ..Self::new()
        }
    }

    /// Set the change-of-basis matrix.
    #[must_use]
    pub fn with_basis(mut self, basis: Mat4) -> Self {
        self.basis = basis;
        self
    }

    /// Set the uniform scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set both bounds margins.
    #[must_use]
    pub fn with_bounds_margins(mut self, margin: f32, vertical_margin: f32) -> Self {
        self.bounds_margin = margin;
        self.bounds_vertical_margin = vertical_margin;
        self
    }

    /// Validate and precompute the basis conversion.
    ///
    /// Returns `None` if the basis is singular or the scale is zero or not
    /// finite.
    pub fn conversion(&self) -> Option<BasisConversion> {
        if !self.scale.is_finite() || self.scale == 0.0 {
            return None;
        }
        BasisConversion::new(self.basis, self.scale)
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self::new()
    }
}
