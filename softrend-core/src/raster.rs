/// Triangle rasterization with barycentric interpolation and depth test
use crate::canvas::Canvas;
use crate::geometry::{Vec2f, Vec3f, Vec4f};
use crate::shader::Shader;

/// Per-pixel depth record for one frame.
///
/// Initialized to the most negative representable value; a pixel is
/// overwritten only when the new interpolated depth is strictly greater
/// than the stored one. Larger depth means nearer in this pipeline, an
/// artifact of the projection sign. The comparison direction must stay
/// exactly as is.
pub struct DepthBuffer {
    width: usize,
    height: usize,
    buf: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            buf: vec![f32::MIN; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.buf[x + y * self.width]
    }

    fn set(&mut self, x: usize, y: usize, z: f32) {
        self.buf[x + y * self.width] = z;
    }
}

/// Barycentric coordinates of `p` with respect to triangle `abc`, via
/// the 2D cross-product method.
///
/// When the cross product's z-magnitude falls at or below 1e-2 the
/// triangle is degenerate for this pixel and the sentinel `(-1, 1, 1)`
/// is returned, which the caller's sign test rejects.
pub fn barycentric(a: Vec2f, b: Vec2f, c: Vec2f, p: Vec2f) -> Vec3f {
    let s0 = Vec3f::new(c.x - a.x, b.x - a.x, a.x - p.x);
    let s1 = Vec3f::new(c.y - a.y, b.y - a.y, a.y - p.y);
    let u = s0.cross(s1);

    if u.z.abs() > 1e-2 {
        Vec3f::new(1.0 - (u.x + u.y) / u.z, u.y / u.z, u.x / u.z)
    } else {
        Vec3f::new(-1.0, 1.0, 1.0)
    }
}

/// Rasterizes one vertex-shaded triangle into the canvas.
///
/// Covered pixels interpolate the raw clip-space z for the depth test;
/// shading attributes are interpolated by the shader itself from the
/// barycentric weights. The inside test is inclusive (weights >= 0), so
/// pixels exactly on a shared edge belong to both adjacent triangles;
/// there is no tie-break rule.
pub fn triangle(pts: &[Vec4f; 3], shader: &dyn Shader, canvas: &mut Canvas, zbuf: &mut DepthBuffer) {
    let mut screen = [Vec2f::default(); 3];
    let mut bboxmin = Vec2f::new(f32::MAX, f32::MAX);
    let mut bboxmax = Vec2f::new(-f32::MAX, -f32::MAX);

    for i in 0..3 {
        // Perspective division; a zero w is left undivided.
        screen[i] = if pts[i].w != 0.0 {
            Vec2f::new(pts[i].x / pts[i].w, pts[i].y / pts[i].w)
        } else {
            Vec2f::new(pts[i].x, pts[i].y)
        };

        bboxmin.x = bboxmin.x.min(screen[i].x);
        bboxmin.y = bboxmin.y.min(screen[i].y);
        bboxmax.x = bboxmax.x.max(screen[i].x);
        bboxmax.y = bboxmax.y.max(screen[i].y);
    }

    // Clamp the box to the canvas; off-screen triangles shrink to
    // nothing rather than being rejected outright.
    let clamp = Vec2f::new(canvas.width() as f32 - 1.0, canvas.height() as f32 - 1.0);
    bboxmin.x = bboxmin.x.clamp(0.0, clamp.x);
    bboxmin.y = bboxmin.y.clamp(0.0, clamp.y);
    bboxmax.x = bboxmax.x.clamp(0.0, clamp.x);
    bboxmax.y = bboxmax.y.clamp(0.0, clamp.y);

    for px in bboxmin.x as i32..=bboxmax.x as i32 {
        for py in bboxmin.y as i32..=bboxmax.y as i32 {
            let bc = barycentric(
                screen[0],
                screen[1],
                screen[2],
                Vec2f::new(px as f32, py as f32),
            );
            if bc.x < 0.0 || bc.y < 0.0 || bc.z < 0.0 {
                continue;
            }

            let mut z = 0.0;
            let mut _w = 0.0;
            for i in 0..3 {
                z += pts[i].z * bc[i];
                _w += pts[i].w * bc[i];
            }

            let (x, y) = (px as usize, py as usize);
            if zbuf.get(x, y) < z {
                zbuf.set(x, y, z);
                if let Some(color) = shader.fragment(bc) {
                    canvas.set(x as u32, y as u32, color);
                }
            }
        }
    }
}

/// Frame driver: runs the shader's vertex stage over every face of the
/// draw and dispatches each resulting triangle to the rasterizer.
pub fn render(
    nfaces: usize,
    shader: &mut dyn Shader,
    canvas: &mut Canvas,
    zbuf: &mut DepthBuffer,
) {
    for i in 0..nfaces {
        let pts = [
            shader.vertex(i, 0),
            shader.vertex(i, 1),
            shader.vertex(i, 2),
        ];
        triangle(&pts, shader, canvas, zbuf);
    }
    log::debug!("rasterized {nfaces} faces");
}
