//! Dense `R x C` matrices with const-generic dimensions.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec4`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//!
//! Per-vertex varyings are kept column-wise (`Matrix<2, 3>` holds one UV per
//! column), so multiplying by a barycentric `Vec3` interpolates them:
//!
//! ```ignore
//! varying_uv.set_col(nth, uv.into());
//! let uv_at_pixel: Vec2 = varying_uv * bar;
//! ```

use std::ops::{Index, IndexMut, Mul};

use super::vec2::{Uv, Vec2};
use super::vec3::Vec3;
use super::vec4::Vec4;
use crate::error::{Error, Result};

/// Pivots smaller than this are treated as zero during inversion.
const SINGULAR_EPSILON: f32 = 1e-8;

/// Matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<const R: usize, const C: usize> {
    data: [[f32; C]; R],
}

pub type Mat4 = Matrix<4, 4>;
pub type Mat3 = Matrix<3, 3>;

impl<const R: usize, const C: usize> Default for Matrix<R, C> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const R: usize, const C: usize> Matrix<R, C> {
    pub const fn new(data: [[f32; C]; R]) -> Self {
        Matrix { data }
    }

    pub const fn zeros() -> Self {
        Matrix {
            data: [[0.0; C]; R],
        }
    }

    pub const fn rows(&self) -> usize {
        R
    }

    pub const fn cols(&self) -> usize {
        C
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    /// Set element at [row][col].
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row][col] = value;
    }

    pub fn row(&self, row: usize) -> [f32; C] {
        self.data[row]
    }

    pub fn set_row(&mut self, row: usize, values: [f32; C]) {
        self.data[row] = values;
    }

    pub fn col(&self, col: usize) -> [f32; R] {
        let mut out = [0.0; R];
        for (row, value) in out.iter_mut().enumerate() {
            *value = self.data[row][col];
        }
        out
    }

    pub fn set_col(&mut self, col: usize, values: [f32; R]) {
        for (row, value) in values.into_iter().enumerate() {
            self.data[row][col] = value;
        }
    }

    pub fn transpose(&self) -> Matrix<C, R> {
        let mut out = Matrix::<C, R>::zeros();
        for row in 0..R {
            for col in 0..C {
                out.data[col][row] = self.data[row][col];
            }
        }
        out
    }
}

impl<const N: usize> Matrix<N, N> {
    pub fn identity() -> Self {
        let mut m = Self::zeros();
        for i in 0..N {
            m.data[i][i] = 1.0;
        }
        m
    }

    /// Computes the inverse with Gauss-Jordan elimination and partial pivoting.
    ///
    /// Returns [`Error::SingularMatrix`] when no usable pivot exists for some
    /// column.
    pub fn inverse(&self) -> Result<Self> {
        let mut a = self.data;
        let mut inv = Self::identity().data;

        for col in 0..N {
            let pivot_row = (col..N)
                .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
                .unwrap_or(col);
            if !(a[pivot_row][col].abs() > SINGULAR_EPSILON) {
                return Err(Error::SingularMatrix);
            }
            a.swap(col, pivot_row);
            inv.swap(col, pivot_row);

            let pivot = a[col][col];
            for k in 0..N {
                a[col][k] /= pivot;
                inv[col][k] /= pivot;
            }

            for row in 0..N {
                if row == col {
                    continue;
                }
                let factor = a[row][col];
                if factor == 0.0 {
                    continue;
                }
                for k in 0..N {
                    a[row][k] -= factor * a[col][k];
                    inv[row][k] -= factor * inv[col][k];
                }
            }
        }

        Ok(Self::new(inv))
    }
}

impl Mat4 {
    /// Creates a translation matrix.
    ///
    /// Translation is stored in the last column (column-vector convention).
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a scale matrix.
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// `(M^-1)^T`, the matrix that carries normals along with `M`.
    ///
    /// Normals transformed by `M` itself stop being perpendicular to their
    /// surface as soon as `M` scales non-uniformly.
    pub fn invert_transpose(&self) -> Result<Self> {
        Ok(self.inverse()?.transpose())
    }
}

impl<const R: usize, const C: usize> Index<(usize, usize)> for Matrix<R, C> {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        &self.data[row][col]
    }
}

impl<const R: usize, const C: usize> IndexMut<(usize, usize)> for Matrix<R, C> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        &mut self.data[row][col]
    }
}

/// Matrix multiplication; the inner dimensions must agree at compile time.
///
/// With column vectors, `A * B * v` applies B first, then A.
impl<const R: usize, const K: usize, const C: usize> Mul<Matrix<K, C>> for Matrix<R, K> {
    type Output = Matrix<R, C>;

    fn mul(self, rhs: Matrix<K, C>) -> Self::Output {
        let mut result = Matrix::<R, C>::zeros();

        for row in 0..R {
            for col in 0..C {
                result.data[row][col] = (0..K).map(|k| self.data[row][k] * rhs.data[k][col]).sum();
            }
        }

        result
    }
}

/// Scales every entry.
impl<const R: usize, const C: usize> Mul<f32> for Matrix<R, C> {
    type Output = Matrix<R, C>;

    fn mul(mut self, rhs: f32) -> Self::Output {
        for row in self.data.iter_mut() {
            for value in row.iter_mut() {
                *value *= rhs;
            }
        }
        self
    }
}

/// Transform a Vec4 by a matrix: Mat4 * Vec4 (column vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let d = &self.data;
        Vec4::new(
            d[0][0] * v.x + d[0][1] * v.y + d[0][2] * v.z + d[0][3] * v.w,
            d[1][0] * v.x + d[1][1] * v.y + d[1][2] * v.z + d[1][3] * v.w,
            d[2][0] * v.x + d[2][1] * v.y + d[2][2] * v.z + d[2][3] * v.w,
            d[3][0] * v.x + d[3][1] * v.y + d[3][2] * v.z + d[3][3] * v.w,
        )
    }
}

/// Transform a point: Mat4 * Vec3 (treats Vec3 as column vector with w=1).
///
/// Applies perspective division if w != 1.
impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Self::Output {
        (self * Vec4::point(v)).to_vec3_perspective()
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Self::Output {
        let d = &self.data;
        Vec3::new(
            d[0][0] * v.x + d[0][1] * v.y + d[0][2] * v.z,
            d[1][0] * v.x + d[1][1] * v.y + d[1][2] * v.z,
            d[2][0] * v.x + d[2][1] * v.y + d[2][2] * v.z,
        )
    }
}

/// Weighted sum of three 2-component columns.
impl Mul<Vec3> for Matrix<2, 3> {
    type Output = Vec2;

    fn mul(self, v: Vec3) -> Self::Output {
        let d = &self.data;
        Vec2::new(
            d[0][0] * v.x + d[0][1] * v.y + d[0][2] * v.z,
            d[1][0] * v.x + d[1][1] * v.y + d[1][2] * v.z,
        )
    }
}

impl From<Vec2> for [f32; 2] {
    fn from(v: Vec2) -> Self {
        [v.x, v.y]
    }
}

impl From<Uv> for [f32; 2] {
    fn from(uv: Uv) -> Self {
        [uv.u, uv.v]
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl From<Vec4> for [f32; 4] {
    fn from(v: Vec4) -> Self {
        [v.x, v.y, v.z, v.w]
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(a: [f32; 2]) -> Self {
        Vec2::new(a[0], a[1])
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(a: [f32; 3]) -> Self {
        Vec3::new(a[0], a[1], a[2])
    }
}

impl From<[f32; 4]> for Vec4 {
    fn from(a: [f32; 4]) -> Self {
        Vec4::new(a[0], a[1], a[2], a[3])
    }
}
