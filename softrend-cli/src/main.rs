/// Softrend - one-shot CPU renderer
///
/// Loads an OBJ model, renders it with Phong lighting, and writes the
/// frame to an image file.
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use softrend_core::{
    render, Camera, Canvas, CubeFrameShader, DepthBuffer, Model, PhongShader, Rgba, Transforms,
    Vec3f,
};

#[derive(Parser, Debug)]
#[command(name = "softrend", about = "CPU software renderer")]
struct Args {
    /// Path to the OBJ model to render
    #[arg(default_value = "obj/african_head.obj")]
    model: PathBuf,

    /// Output image path (format chosen by extension)
    #[arg(short, long, default_value = "output.tga")]
    output: PathBuf,

    /// Output image width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Output image height in pixels
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Overlay a translucent unit cube around the model
    #[arg(long)]
    cube: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let model = Model::load(&args.model)
        .with_context(|| format!("loading model `{}`", args.model.display()))?;

    let camera = Camera::new(
        Vec3f::new(1.0, 1.0, 3.0),
        Vec3f::new(0.0, 0.0, 0.0),
        Vec3f::new(0.0, 1.0, 0.0),
    );
    let (w, h) = (args.width as f32, args.height as f32);
    let transforms = Transforms::new(&camera, w / 8.0, h / 8.0, w * 3.0 / 4.0, h * 3.0 / 4.0);

    let mut canvas = Canvas::new(args.width, args.height);
    let mut zbuf = DepthBuffer::new(args.width as usize, args.height as usize);
    let mut shader = PhongShader::new(
        &model,
        &transforms,
        Vec3f::new(0.0, 0.0, -1.0),
        camera.eye,
    );

    log::info!(
        "rendering {} faces at {}x{}",
        model.nfaces(),
        args.width,
        args.height
    );
    render(model.nfaces(), &mut shader, &mut canvas, &mut zbuf);

    if args.cube {
        let mut cube = CubeFrameShader::new(
            &transforms,
            2.0,
            Vec3f::new(0.0, 0.0, 0.0),
            Rgba([120, 200, 255, 128]),
        );
        render(cube.nfaces(), &mut cube, &mut canvas, &mut zbuf);
    }

    canvas.flip_vertically();
    canvas
        .save(&args.output)
        .with_context(|| format!("saving image `{}`", args.output.display()))?;
    log::info!("wrote `{}`", args.output.display());

    Ok(())
}
