/// Camera and transform-chain construction
use crate::geometry::Vec3f;
use crate::matrix::Matrix;

/// Depth range the viewport matrix maps the canonical cube into.
pub const DEPTH: f32 = 255.0;

/// Camera configuration: eye position, look-at center, up hint.
///
/// The up hint must not be parallel to `eye - center`; a degenerate
/// pairing yields an undefined basis (unchecked precondition).
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vec3f,
    pub center: Vec3f,
    pub up: Vec3f,
}

impl Camera {
    pub fn new(eye: Vec3f, center: Vec3f, up: Vec3f) -> Self {
        Self { eye, center, up }
    }

    /// Builds the view matrix from an orthonormal basis.
    ///
    /// forward = normalize(eye - center), right = normalize(up x forward),
    /// true up = normalize(forward x right). Basis rows 0..2 carry
    /// right/true-up/forward; composed with a translation by -center.
    pub fn look_at(&self) -> Matrix {
        let z = (self.eye - self.center).normalized();
        let x = self.up.cross(z).normalized();
        let y = z.cross(x).normalized();

        let mut minv = Matrix::identity(4);
        let mut tr = Matrix::identity(4);
        for i in 0..3 {
            minv[(0, i)] = x[i];
            minv[(1, i)] = y[i];
            minv[(2, i)] = z[i];
            tr[(i, 3)] = -self.center[i];
        }
        minv * tr
    }

    /// Perspective coefficient for this camera, `-1 / |eye - center|`.
    pub fn projection_coeff(&self) -> f32 {
        -1.0 / (self.eye - self.center).norm()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Vec3f::new(1.0, 1.0, 3.0),
            Vec3f::new(0.0, 0.0, 0.0),
            Vec3f::new(0.0, 1.0, 0.0),
        )
    }
}

/// Projection matrix: identity with the single perspective-divide
/// coefficient at row 3, column 2.
pub fn projection(coeff: f32) -> Matrix {
    let mut p = Matrix::identity(4);
    p[(3, 2)] = coeff;
    p
}

/// Viewport matrix mapping the canonical [-1, 1] cube to a screen box
/// at (x, y) of size (w, h), with depth scaled into [0, DEPTH].
pub fn viewport(x: f32, y: f32, w: f32, h: f32) -> Matrix {
    let mut vp = Matrix::identity(4);
    vp[(0, 3)] = x + w / 2.0;
    vp[(1, 3)] = y + h / 2.0;
    vp[(2, 3)] = DEPTH / 2.0;

    vp[(0, 0)] = w / 2.0;
    vp[(1, 1)] = h / 2.0;
    vp[(2, 2)] = DEPTH / 2.0;
    vp
}

/// The per-frame transform set, owned by the driver and held immutably
/// during rasterization. Replaces any process-wide mutable state.
#[derive(Debug, Clone)]
pub struct Transforms {
    pub model_view: Matrix,
    pub projection: Matrix,
    pub viewport: Matrix,
}

impl Transforms {
    /// Derives the full set from camera parameters and a viewport box.
    pub fn new(camera: &Camera, vp_x: f32, vp_y: f32, vp_w: f32, vp_h: f32) -> Self {
        Self {
            model_view: camera.look_at(),
            projection: projection(camera.projection_coeff()),
            viewport: viewport(vp_x, vp_y, vp_w, vp_h),
        }
    }

    /// Composed screen transform: `viewport * projection * model_view`.
    pub fn matrix(&self) -> Matrix {
        &self.viewport * &(&self.projection * &self.model_view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec4f;
    use approx::assert_relative_eq;

    #[test]
    fn test_look_at_axis_aligned_camera() {
        // Eye on +z looking at the origin: the basis is the world basis
        // and the translation is zero, so the view matrix is identity.
        let camera = Camera::new(
            Vec3f::new(0.0, 0.0, 5.0),
            Vec3f::new(0.0, 0.0, 0.0),
            Vec3f::new(0.0, 1.0, 0.0),
        );
        let view = camera.look_at();
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(view[(i, j)], expected, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_look_at_translates_by_center() {
        let center = Vec3f::new(1.0, 2.0, 3.0);
        let camera = Camera::new(
            center + Vec3f::new(0.0, 0.0, 5.0),
            center,
            Vec3f::new(0.0, 1.0, 0.0),
        );
        let view = camera.look_at();
        // The look-at center lands at the camera-space origin.
        let p = &view * center;
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_look_at_basis_is_orthonormal() {
        let camera = Camera::default();
        let view = camera.look_at();
        for i in 0..3 {
            let row = Vec3f::new(view[(i, 0)], view[(i, 1)], view[(i, 2)]);
            assert_relative_eq!(row.norm(), 1.0, epsilon = 1e-6);
            for k in (i + 1)..3 {
                let other = Vec3f::new(view[(k, 0)], view[(k, 1)], view[(k, 2)]);
                assert_relative_eq!(row * other, 0.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_projection_coefficient_placement() {
        let p = projection(-0.25);
        assert_relative_eq!(p[(3, 2)], -0.25);
        // Everything else stays identity.
        assert_relative_eq!(p[(0, 0)], 1.0);
        assert_relative_eq!(p[(3, 3)], 1.0);
    }

    #[test]
    fn test_viewport_maps_canonical_cube() {
        let vp = viewport(100.0, 100.0, 600.0, 600.0);
        // Center of the cube maps to the center of the box at half depth.
        let c = &vp * Vec3f::new(0.0, 0.0, 0.0);
        assert_relative_eq!(c.x, 400.0);
        assert_relative_eq!(c.y, 400.0);
        assert_relative_eq!(c.z, DEPTH / 2.0);
        // Corner (1, 1, 1) maps to the far corner at full depth.
        let far = &vp * Vec3f::new(1.0, 1.0, 1.0);
        assert_relative_eq!(far.x, 700.0);
        assert_relative_eq!(far.y, 700.0);
        assert_relative_eq!(far.z, DEPTH);
    }

    #[test]
    fn test_transforms_compose_right_to_left() {
        let camera = Camera::default();
        let t = Transforms::new(&camera, 0.0, 0.0, 800.0, 800.0);
        let composed = t.matrix();
        let manual = &t.viewport * &(&t.projection * &t.model_view);
        for i in 0..4 {
            for j in 0..4 {
                assert_relative_eq!(composed[(i, j)], manual[(i, j)]);
            }
        }
        // The composed transform carries perspective in row 3.
        let v = &composed * Vec4f::new(0.0, 0.0, 0.0, 1.0);
        assert!(v.w != 0.0);
    }
}
