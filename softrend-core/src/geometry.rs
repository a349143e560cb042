/// Fixed-size numeric vector types used throughout the pipeline
use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

/// Scalar types the vector structs can be instantiated with.
///
/// Implemented for `f32` and `i32`; conversions between the two vector
/// flavors are explicit and rounding (see the `From` impls on [`Vec3`]).
pub trait Scalar:
    Copy
    + Default
    + PartialEq
    + fmt::Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
{
}

impl Scalar for f32 {}
impl Scalar for i32 {}

/// A 2-component vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2<T: Scalar> {
    pub x: T,
    pub y: T,
}

/// A 3-component vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3<T: Scalar> {
    pub x: T,
    pub y: T,
    pub z: T,
}

/// A 4-component homogeneous vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec4<T: Scalar> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
}

pub type Vec2f = Vec2<f32>;
pub type Vec2i = Vec2<i32>;
pub type Vec3f = Vec3<f32>;
pub type Vec3i = Vec3<i32>;
pub type Vec4f = Vec4<f32>;

impl<T: Scalar> Vec2<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Scalar> Vec3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Cross product by the right-hand-rule determinant formula.
    pub fn cross(self, v: Self) -> Self {
        Self {
            x: self.y * v.z - self.z * v.y,
            y: self.z * v.x - self.x * v.z,
            z: self.x * v.y - self.y * v.x,
        }
    }
}

impl<T: Scalar> Vec4<T> {
    pub fn new(x: T, y: T, z: T, w: T) -> Self {
        Self { x, y, z, w }
    }
}

impl Vec3<f32> {
    pub fn norm(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Scales the vector in place so its norm becomes `len`.
    ///
    /// Undefined for vectors of ~zero norm; callers must not normalize
    /// a zero vector.
    pub fn normalize(&mut self, len: f32) {
        *self = *self * (len / self.norm());
    }

    /// Returns a unit-length copy. Same zero-norm precondition as
    /// [`normalize`](Self::normalize).
    pub fn normalized(self) -> Self {
        let mut v = self;
        v.normalize(1.0);
        v
    }
}

// Component-wise addition and subtraction.

impl<T: Scalar> Add for Vec2<T> {
    type Output = Self;
    fn add(self, v: Self) -> Self {
        Self::new(self.x + v.x, self.y + v.y)
    }
}

impl<T: Scalar> Sub for Vec2<T> {
    type Output = Self;
    fn sub(self, v: Self) -> Self {
        Self::new(self.x - v.x, self.y - v.y)
    }
}

impl<T: Scalar> Add for Vec3<T> {
    type Output = Self;
    fn add(self, v: Self) -> Self {
        Self::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl<T: Scalar> Sub for Vec3<T> {
    type Output = Self;
    fn sub(self, v: Self) -> Self {
        Self::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

// Scaling by a scalar returns a vector; multiplying two Vec3 values is
// the dot product and returns a scalar. Both operations exist, distinct.

impl<T: Scalar> Mul<T> for Vec2<T> {
    type Output = Self;
    fn mul(self, f: T) -> Self {
        Self::new(self.x * f, self.y * f)
    }
}

impl<T: Scalar> Mul<T> for Vec3<T> {
    type Output = Self;
    fn mul(self, f: T) -> Self {
        Self::new(self.x * f, self.y * f, self.z * f)
    }
}

impl<T: Scalar> Mul<Vec3<T>> for Vec3<T> {
    type Output = T;
    fn mul(self, v: Vec3<T>) -> T {
        self.x * v.x + self.y * v.y + self.z * v.z
    }
}

impl<T: Scalar> Index<usize> for Vec2<T> {
    type Output = T;
    fn index(&self, i: usize) -> &T {
        match i {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Vec2 index out of range: {i}"),
        }
    }
}

impl<T: Scalar> Index<usize> for Vec3<T> {
    type Output = T;
    fn index(&self, i: usize) -> &T {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 index out of range: {i}"),
        }
    }
}

impl<T: Scalar> IndexMut<usize> for Vec3<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vec3 index out of range: {i}"),
        }
    }
}

impl<T: Scalar> Index<usize> for Vec4<T> {
    type Output = T;
    fn index(&self, i: usize) -> &T {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Vec4 index out of range: {i}"),
        }
    }
}

impl<T: Scalar> IndexMut<usize> for Vec4<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Vec4 index out of range: {i}"),
        }
    }
}

/// Round-to-nearest conversion, never truncation.
impl From<Vec3<f32>> for Vec3<i32> {
    fn from(v: Vec3<f32>) -> Self {
        Self::new(v.x.round() as i32, v.y.round() as i32, v.z.round() as i32)
    }
}

impl From<Vec3<i32>> for Vec3<f32> {
    fn from(v: Vec3<i32>) -> Self {
        Self::new(v.x as f32, v.y as f32, v.z as f32)
    }
}

impl<T: Scalar> fmt::Display for Vec2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl<T: Scalar> fmt::Display for Vec3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl<T: Scalar> fmt::Display for Vec4<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}
