/// Wavefront OBJ model loading
///
/// Only the records the pipeline consumes are parsed: `v` position
/// lines and `f` face lines (vertex indices only; texture and normal
/// indices inside a face token are accepted and discarded). Everything
/// else is skipped. Faces must be triangles.
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{digit1, multispace1},
    combinator::map_res,
    multi::many1,
    number::complete::float,
    sequence::preceded,
    IResult,
};

use crate::geometry::Vec3f;

/// Errors produced while loading a model or its texture.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed OBJ record at line {line}: `{text}`")]
    Malformed { line: usize, text: String },
    #[error("face at line {line} has {count} vertices; only triangles are supported")]
    NonTriangleFace { line: usize, count: usize },
    #[error("face references vertex {index} but only {nverts} vertices were loaded")]
    VertexIndexOutOfRange { index: usize, nverts: usize },
    #[error("failed to load texture: {0}")]
    Texture(#[from] image::ImageError),
}

/// An indexed triangle mesh with an optional texture.
#[derive(Debug, Clone, Default)]
pub struct Model {
    verts: Vec<Vec3f>,
    faces: Vec<[usize; 3]>,
    texture: Option<RgbaImage>,
}

impl Model {
    /// Loads a model from an OBJ file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::parse(&text)?;
        log::info!(
            "loaded `{}`: {} vertices, {} faces",
            path.display(),
            model.nverts(),
            model.nfaces()
        );
        Ok(model)
    }

    /// Parses OBJ text into a model.
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let mut verts = Vec::new();
        let mut faces = Vec::new();

        for (number, raw) in text.lines().enumerate() {
            let line = raw.trim();
            let number = number + 1;
            if line.starts_with("v ") {
                let (_, vert) = parse_vertex(line).map_err(|_| ModelError::Malformed {
                    line: number,
                    text: line.to_string(),
                })?;
                verts.push(vert);
            } else if line.starts_with("f ") {
                let (_, indices) = parse_face(line).map_err(|_| ModelError::Malformed {
                    line: number,
                    text: line.to_string(),
                })?;
                if indices.len() != 3 {
                    return Err(ModelError::NonTriangleFace {
                        line: number,
                        count: indices.len(),
                    });
                }
                // OBJ indices are 1-based; zero is not a valid index.
                if indices.contains(&0) {
                    return Err(ModelError::Malformed {
                        line: number,
                        text: line.to_string(),
                    });
                }
                faces.push([indices[0] - 1, indices[1] - 1, indices[2] - 1]);
            }
            // Other records (vt, vn, comments, groups) are skipped.
        }

        for face in &faces {
            for &index in face {
                if index >= verts.len() {
                    return Err(ModelError::VertexIndexOutOfRange {
                        index: index + 1,
                        nverts: verts.len(),
                    });
                }
            }
        }

        Ok(Self {
            verts,
            faces,
            texture: None,
        })
    }

    /// Builds a model directly from vertex and face lists.
    pub fn from_parts(verts: Vec<Vec3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            verts,
            faces,
            texture: None,
        }
    }

    pub fn nverts(&self) -> usize {
        self.verts.len()
    }

    pub fn nfaces(&self) -> usize {
        self.faces.len()
    }

    pub fn vert(&self, i: usize) -> Vec3f {
        self.verts[i]
    }

    /// Ordered vertex indices of face `i` (always three).
    pub fn face(&self, i: usize) -> [usize; 3] {
        self.faces[i]
    }

    /// Loads a texture image to sample colors from.
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let img = image::open(path.as_ref())?.to_rgba8();
        self.texture = Some(img);
        Ok(())
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    /// Nearest-pixel texture lookup by normalized (u, v); v runs bottom
    /// to top. Opaque white when no texture is loaded.
    pub fn texture_color(&self, u: f32, v: f32) -> Rgba<u8> {
        match &self.texture {
            Some(tex) => {
                let x = (u.clamp(0.0, 1.0) * (tex.width() - 1) as f32).round() as u32;
                let y = ((1.0 - v.clamp(0.0, 1.0)) * (tex.height() - 1) as f32).round() as u32;
                *tex.get_pixel(x, y)
            }
            None => Rgba([255, 255, 255, 255]),
        }
    }
}

fn parse_vertex(input: &str) -> IResult<&str, Vec3f> {
    let (input, _) = tag("v")(input)?;
    let (input, x) = preceded(multispace1, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, Vec3f::new(x, y, z)))
}

fn parse_face(input: &str) -> IResult<&str, Vec<usize>> {
    let (input, _) = tag("f")(input)?;
    many1(preceded(multispace1, face_index))(input)
}

/// One face token: the leading vertex index, with any `/t`, `/t/n` or
/// `//n` suffix discarded.
fn face_index(input: &str) -> IResult<&str, usize> {
    let (input, index) = map_res(digit1, str::parse::<usize>)(input)?;
    let (input, _) = take_till(|c: char| c.is_whitespace())(input)?;
    Ok((input, index))
}
