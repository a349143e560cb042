/// Dense row-major matrix of f32 values
///
/// Storage is a flat, contiguous `Vec<f32>` indexed by `(row, col)`.
/// Dimensions are chosen at construction; the transform chain only ever
/// builds 4x4 matrices but the type itself is rectangular.
use std::fmt;
use std::ops::{Index, IndexMut, Mul};

use crate::geometry::{Vec3f, Vec4f};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    m: Vec<f32>,
}

impl Matrix {
    /// Creates a zero-filled matrix of the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            m: vec![0.0; rows * cols],
        }
    }

    /// Identity matrix of any square dimension.
    pub fn identity(dim: usize) -> Self {
        let mut e = Self::new(dim, dim);
        for i in 0..dim {
            e[(i, i)] = 1.0;
        }
        e
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Returns the transposed matrix without mutating the source.
    pub fn transpose(&self) -> Self {
        let mut result = Self::new(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                result[(j, i)] = self[(i, j)];
            }
        }
        result
    }

    /// Gauss-Jordan inversion, defined for 4x4 matrices only.
    ///
    /// A zero pivot means the matrix is singular; the contract then
    /// returns `identity(4)` as a sentinel instead of signaling an
    /// error. This masks singularities and is a documented sharp edge,
    /// preserved because downstream behavior depends on the exact
    /// fallback value.
    pub fn invert(&self) -> Self {
        assert!(
            self.rows == 4 && self.cols == 4,
            "invert is only defined for 4x4 matrices"
        );

        let mut result = Self::identity(4);
        let mut src = self.clone();

        for i in 0..4 {
            let diag = src[(i, i)];
            if diag == 0.0 {
                return Self::identity(4);
            }

            for j in 0..4 {
                src[(i, j)] /= diag;
                result[(i, j)] /= diag;
            }

            for k in 0..4 {
                if k != i {
                    let factor = src[(k, i)];
                    for j in 0..4 {
                        let s = src[(i, j)];
                        let r = result[(i, j)];
                        src[(k, j)] -= factor * s;
                        result[(k, j)] -= factor * r;
                    }
                }
            }
        }
        result
    }

    /// Inverse transpose, the matrix that transforms normal vectors
    /// correctly under non-uniform scale or shear.
    pub fn invert_transpose(&self) -> Self {
        self.invert().transpose()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;
    fn index(&self, (i, j): (usize, usize)) -> &f32 {
        assert!(i < self.rows && j < self.cols, "matrix index out of range");
        &self.m[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f32 {
        assert!(i < self.rows && j < self.cols, "matrix index out of range");
        &mut self.m[i * self.cols + j]
    }
}

fn mat_mul(a: &Matrix, b: &Matrix) -> Matrix {
    assert_eq!(
        a.cols, b.rows,
        "matrix shapes incompatible for multiplication"
    );
    let mut result = Matrix::new(a.rows, b.cols);
    for i in 0..a.rows {
        for j in 0..b.cols {
            let mut sum = 0.0;
            for k in 0..a.cols {
                sum += a[(i, k)] * b[(k, j)];
            }
            result[(i, j)] = sum;
        }
    }
    result
}

impl Mul for &Matrix {
    type Output = Matrix;
    fn mul(self, rhs: &Matrix) -> Matrix {
        mat_mul(self, rhs)
    }
}

impl Mul for Matrix {
    type Output = Matrix;
    fn mul(self, rhs: Matrix) -> Matrix {
        mat_mul(&self, &rhs)
    }
}

/// Standard matrix-vector product for homogeneous 4-vectors.
impl Mul<Vec4f> for &Matrix {
    type Output = Vec4f;
    fn mul(self, v: Vec4f) -> Vec4f {
        assert!(
            self.rows == 4 && self.cols == 4,
            "vector products require a 4x4 matrix"
        );
        let mut result = Vec4f::default();
        for i in 0..4 {
            let mut sum = 0.0;
            for j in 0..4 {
                sum += self[(i, j)] * v[j];
            }
            result[i] = sum;
        }
        result
    }
}

/// Promotes the vector to homogeneous coordinates (w = 1), applies the
/// 4x4 product, and performs the perspective division by the resulting
/// w. A w of exactly zero skips the division; the raw x/y/z are kept as
/// a point already at infinity.
impl Mul<Vec3f> for &Matrix {
    type Output = Vec3f;
    fn mul(self, v: Vec3f) -> Vec3f {
        let result = self * Vec4f::new(v.x, v.y, v.z, 1.0);
        if result.w != 0.0 {
            Vec3f::new(
                result.x / result.w,
                result.y / result.w,
                result.z / result.w,
            )
        } else {
            Vec3f::new(result.x, result.y, result.z)
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            for j in 0..self.cols {
                write!(f, "{} ", self[(i, j)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
