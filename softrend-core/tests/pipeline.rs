//! End-to-end pipeline test: OBJ text through the full transform,
//! shading, and rasterization chain.

use image::Rgba;
use softrend_core::{render, Camera, Canvas, DepthBuffer, Model, PhongShader, Transforms, Vec3f};

const PYRAMID_OBJ: &str = "\
v -0.5 0.0 -0.5
v 0.5 0.0 -0.5
v 0.5 0.0 0.5
v -0.5 0.0 0.5
v 0.0 0.8 0.0
f 1 2 5
f 2 3 5
f 3 4 5
f 4 1 5
f 1 3 2
f 1 4 3
";

#[test]
fn render_pyramid_produces_shaded_coverage() {
    let model = Model::parse(PYRAMID_OBJ).expect("valid OBJ");
    assert_eq!(model.nfaces(), 6);

    let (width, height) = (100u32, 100u32);
    let camera = Camera::new(
        Vec3f::new(1.0, 1.0, 3.0),
        Vec3f::new(0.0, 0.0, 0.0),
        Vec3f::new(0.0, 1.0, 0.0),
    );
    let transforms = Transforms::new(
        &camera,
        width as f32 / 8.0,
        height as f32 / 8.0,
        width as f32 * 3.0 / 4.0,
        height as f32 * 3.0 / 4.0,
    );

    let mut canvas = Canvas::new(width, height);
    let mut zbuf = DepthBuffer::new(width as usize, height as usize);
    let mut shader = PhongShader::new(
        &model,
        &transforms,
        Vec3f::new(0.0, 0.0, -1.0),
        camera.eye,
    );

    render(model.nfaces(), &mut shader, &mut canvas, &mut zbuf);

    let background = Rgba([0, 0, 0, 255]);
    let mut covered = 0usize;
    for x in 0..width {
        for y in 0..height {
            let px = canvas.get(x, y);
            if px != background {
                covered += 1;
                // The Phong shader broadcasts a grayscale intensity.
                assert_eq!(px[0], px[1]);
                assert_eq!(px[1], px[2]);
                assert_eq!(px[3], 255);
                // A covered pixel also recorded a depth.
                assert!(zbuf.get(x as usize, y as usize) > f32::MIN);
            }
        }
    }
    assert!(covered > 0, "the pyramid must cover some pixels");

    // The viewport box leaves a margin; its outside stays background.
    assert_eq!(canvas.get(0, 0), background);
    assert_eq!(canvas.get(width - 1, height - 1), background);
}

#[test]
fn render_is_deterministic() {
    let model = Model::parse(PYRAMID_OBJ).expect("valid OBJ");
    let camera = Camera::default();
    let transforms = Transforms::new(&camera, 10.0, 10.0, 60.0, 60.0);

    let mut first = Canvas::new(80, 80);
    let mut second = Canvas::new(80, 80);
    for canvas in [&mut first, &mut second] {
        let mut zbuf = DepthBuffer::new(80, 80);
        let mut shader = PhongShader::new(
            &model,
            &transforms,
            Vec3f::new(0.0, 0.0, -1.0),
            camera.eye,
        );
        render(model.nfaces(), &mut shader, canvas, &mut zbuf);
    }

    for x in 0..80 {
        for y in 0..80 {
            assert_eq!(first.get(x, y), second.get(x, y));
        }
    }
}
