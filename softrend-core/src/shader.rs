/// Pluggable vertex/fragment shading strategies
use image::Rgba;

use crate::geometry::{Vec3f, Vec4f};
use crate::matrix::Matrix;
use crate::model::Model;
use crate::transform::Transforms;

/// A shading strategy with a per-vertex and a per-pixel stage.
///
/// The vertex stage must be called exactly three times (nthvert 0, 1, 2)
/// before the triangle's fragment stage runs; it fills the shader's
/// varying slots, which the next triangle's vertex calls overwrite.
/// Varyings are transient per-triangle state, never valid across
/// triangles.
pub trait Shader {
    /// Transforms one vertex of face `iface` into clip space and stores
    /// any attributes needed for fragment interpolation in varying slot
    /// `nthvert`.
    fn vertex(&mut self, iface: usize, nthvert: usize) -> Vec4f;

    /// Computes the color for a covered pixel from the barycentric
    /// weights of the current triangle, or `None` to discard the pixel.
    fn fragment(&self, bar: Vec3f) -> Option<Rgba<u8>>;
}

/// Phong lighting over a loaded model, flat-shaded.
///
/// The normal is recomputed from the face's own three positions on
/// every vertex call, so all three varying slots hold the same flat
/// normal; interpolation then reproduces it per pixel.
pub struct PhongShader<'a> {
    pub model: &'a Model,
    pub uniform_m: Matrix,
    pub uniform_mit: Matrix,
    pub uniform_light_dir: Vec3f,
    pub uniform_eye_pos: Vec3f,
    pub varying_normal: [Vec3f; 3],
    pub varying_pos: [Vec3f; 3],
}

impl<'a> PhongShader<'a> {
    pub fn new(
        model: &'a Model,
        transforms: &Transforms,
        light_dir: Vec3f,
        eye_pos: Vec3f,
    ) -> Self {
        let m = transforms.matrix();
        let mit = m.invert_transpose();
        Self {
            model,
            uniform_m: m,
            uniform_mit: mit,
            uniform_light_dir: light_dir.normalized(),
            uniform_eye_pos: eye_pos,
            varying_normal: [Vec3f::default(); 3],
            varying_pos: [Vec3f::default(); 3],
        }
    }
}

impl Shader for PhongShader<'_> {
    fn vertex(&mut self, iface: usize, nthvert: usize) -> Vec4f {
        let face = self.model.face(iface);
        let v = self.model.vert(face[nthvert]);
        let gl_vertex = &self.uniform_m * Vec4f::new(v.x, v.y, v.z, 1.0);

        let v0 = self.model.vert(face[0]);
        let v1 = self.model.vert(face[1]);
        let v2 = self.model.vert(face[2]);
        let normal = (v2 - v0).cross(v1 - v0).normalized();

        self.varying_normal[nthvert] = normal;
        self.varying_pos[nthvert] = v;

        gl_vertex
    }

    fn fragment(&self, bar: Vec3f) -> Option<Rgba<u8>> {
        let n = (self.varying_normal[0] * bar.x
            + self.varying_normal[1] * bar.y
            + self.varying_normal[2] * bar.z)
            .normalized();
        let pos = self.varying_pos[0] * bar.x
            + self.varying_pos[1] * bar.y
            + self.varying_pos[2] * bar.z;

        let light_dir = self.uniform_light_dir.normalized();
        let view_dir = (self.uniform_eye_pos - pos).normalized();
        let reflect_dir = (n * (n * light_dir * 2.0) - light_dir).normalized();

        let ambient = 0.1;
        let diffuse = (n * light_dir).max(0.0);
        let specular = (view_dir * reflect_dir).max(0.0).powi(32);

        let intensity = (ambient + diffuse + specular * 0.5).min(1.0);
        let c = (255.0 * intensity) as u8;
        Some(Rgba([c, c, c, 255]))
    }
}

/// Corner positions of a unit cube centered at the origin.
const CUBE_VERTS: [[f32; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
];

/// Two triangles per cube face.
const CUBE_FACES: [[usize; 3]; 12] = [
    [4, 5, 6],
    [4, 6, 7],
    [0, 3, 2],
    [0, 2, 1],
    [3, 7, 6],
    [3, 6, 2],
    [0, 1, 5],
    [0, 5, 4],
    [1, 2, 6],
    [1, 6, 5],
    [0, 4, 7],
    [0, 7, 3],
];

/// Translucent overlay cube with its own fixed geometry.
///
/// Ignores any external model. The vertex stage records clip-space
/// depth per varying slot; the fragment stage currently returns the
/// constant color regardless of the interpolated depth.
pub struct CubeFrameShader {
    pub uniform_m: Matrix,
    pub color: Rgba<u8>,
    pub verts: [Vec3f; 8],
    pub varying_depth: [f32; 3],
}

impl CubeFrameShader {
    pub fn new(transforms: &Transforms, scale: f32, offset: Vec3f, color: Rgba<u8>) -> Self {
        let mut verts = [Vec3f::default(); 8];
        for (slot, corner) in verts.iter_mut().zip(CUBE_VERTS) {
            *slot = Vec3f::new(corner[0], corner[1], corner[2]) * scale + offset;
        }
        Self {
            uniform_m: transforms.matrix(),
            color,
            verts,
            varying_depth: [0.0; 3],
        }
    }

    /// Number of triangles in the fixed geometry.
    pub fn nfaces(&self) -> usize {
        CUBE_FACES.len()
    }
}

impl Shader for CubeFrameShader {
    fn vertex(&mut self, iface: usize, nthvert: usize) -> Vec4f {
        let v = self.verts[CUBE_FACES[iface][nthvert]];
        let gl_vertex = &self.uniform_m * Vec4f::new(v.x, v.y, v.z, 1.0);
        self.varying_depth[nthvert] = gl_vertex.z;
        gl_vertex
    }

    fn fragment(&self, _bar: Vec3f) -> Option<Rgba<u8>> {
        Some(self.color)
    }
}
