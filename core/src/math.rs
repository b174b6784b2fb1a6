//! Math type aliases and helper functions.
//!
//! All decoded geometry uses f32 nalgebra types. Matrices follow the
//! column-vector convention (`v' = M * v`), so a glTF column-major array maps
//! directly onto [`Mat4::from_column_slice`].

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Quaternion (f32). Stored as `[x, y, z, w]` in memory.
/// Use [`quat_from_array`] or `Quaternion::new(w, x, y, z)` to construct.
pub type Quat = nalgebra::Quaternion<f32>;

/// Create a quaternion from a `[x, y, z, w]` array.
pub fn quat_from_array(a: [f32; 4]) -> Quat {
    nalgebra::Quaternion::new(a[3], a[0], a[1], a[2])
}

/// Homogeneous rotation matrix for a (possibly unnormalized) quaternion.
pub fn mat4_from_rotation(rotation: Quat) -> Mat4 {
    nalgebra::UnitQuaternion::from_quaternion(rotation).to_homogeneous()
}

/// Build a 4x4 TRS matrix: scale first, then rotation, then translation.
pub fn mat4_from_scale_rotation_translation(
    scale: Vec3,
    rotation: Quat,
    translation: Vec3,
) -> Mat4 {
    Mat4::new_translation(&translation)
        * mat4_from_rotation(rotation)
        * Mat4::new_nonuniform_scaling(&scale)
}

/// Translation component of an affine matrix.
pub fn mat4_translation(m: &Mat4) -> Vec3 {
    Vec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

/// Multiply the translation component of an affine matrix by `scale`,
/// leaving the linear part untouched.
pub fn scale_translation(m: &mut Mat4, scale: f32) {
    for row in 0..3 {
        m[(row, 3)] *= scale;
    }
}

/// Change of coordinate basis plus uniform unit scale.
///
/// `basis` maps source (authoring) coordinates onto engine coordinates. In the
/// row-vector notation of most DCC tools the matrix conversion reads
/// `basis⁻¹ · M · basis`; with column vectors the same operation is
/// `basis · M · basis⁻¹`, which is what [`Self::matrix`] computes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasisConversion {
    basis: Mat4,
    inverse: Mat4,
    scale: f32,
}

impl BasisConversion {
    /// Returns `None` when `basis` is singular.
    pub fn new(basis: Mat4, scale: f32) -> Option<Self> {
        let inverse = basis.try_inverse()?;
        Some(Self {
            basis,
            inverse,
            scale,
        })
    }

    /// No basis change, unit scale.
    pub fn identity() -> Self {
        Self {
            basis: Mat4::identity(),
            inverse: Mat4::identity(),
            scale: 1.0,
        }
    }

    pub fn basis(&self) -> &Mat4 {
        &self.basis
    }

    pub fn inverse(&self) -> &Mat4 {
        &self.inverse
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Convert a position: basis change as a point, then uniform scale.
    pub fn point(&self, p: &Vec3) -> Vec3 {
        self.basis.transform_point(&nalgebra::Point3::from(*p)).coords * self.scale
    }

    /// Convert a direction: basis change without translation or scale.
    pub fn direction(&self, v: &Vec3) -> Vec3 {
        self.basis.transform_vector(v)
    }

    /// Convert an authoring-space transform: the translation is scaled first,
    /// then the matrix is sandwiched by the basis change.
    pub fn matrix(&self, m: &Mat4) -> Mat4 {
        let mut scaled = *m;
        scale_translation(&mut scaled, self.scale);
        self.basis * scaled * self.inverse
    }
}

impl Default for BasisConversion {
    fn default() -> Self {
        Self::identity()
    }
}
