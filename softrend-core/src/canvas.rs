/// RGBA output canvas backed by the `image` crate
use std::path::{Path, PathBuf};

use image::{imageops, Rgba, RgbaImage};

/// Errors produced when persisting the canvas.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("failed to save image to `{path}`: {source}")]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// A fixed-size RGBA pixel grid, written by the rasterizer one pixel at
/// a time and saved once at the end of a run.
pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    /// Creates an opaque black canvas of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            img: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    /// Writes one pixel. Out-of-bounds coordinates are ignored; the
    /// rasterizer already clamps its bounding box to the canvas.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        if x < self.img.width() && y < self.img.height() {
            self.img.put_pixel(x, y, color);
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.img.get_pixel(x, y)
    }

    /// Flips the image upside down. The rasterizer addresses pixels
    /// with y growing upward; file formats expect the opposite.
    pub fn flip_vertically(&mut self) {
        self.img = imageops::flip_vertical(&self.img);
    }

    /// Encodes and writes the canvas; the container format is inferred
    /// from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CanvasError> {
        let path = path.as_ref();
        self.img.save(path).map_err(|source| CanvasError::Save {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas_is_opaque_black() {
        let canvas = Canvas::new(4, 4);
        assert_eq!(canvas.get(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(canvas.get(3, 3), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_set_and_get() {
        let mut canvas = Canvas::new(4, 4);
        let red = Rgba([255, 0, 0, 255]);
        canvas.set(1, 2, red);
        assert_eq!(canvas.get(1, 2), red);
    }

    #[test]
    fn test_out_of_bounds_write_is_ignored() {
        let mut canvas = Canvas::new(4, 4);
        canvas.set(10, 10, Rgba([255, 255, 255, 255]));
        // No panic, nothing changed.
        assert_eq!(canvas.get(3, 3), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_flip_vertically() {
        let mut canvas = Canvas::new(2, 3);
        let green = Rgba([0, 255, 0, 255]);
        canvas.set(0, 0, green);
        canvas.flip_vertically();
        assert_eq!(canvas.get(0, 2), green);
        assert_eq!(canvas.get(0, 0), Rgba([0, 0, 0, 255]));
    }
}
