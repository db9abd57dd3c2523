use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

/// 2D float vector, used for projected screen positions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component by index, `None` when `i > 1`.
    pub fn get(&self, i: usize) -> Option<f32> {
        match i {
            0 => Some(self.x),
            1 => Some(self.y),
            _ => None,
        }
    }

    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn magnitude(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    pub fn normalize(&self) -> Self {
        *self / self.magnitude()
    }

    /// Rounds to the nearest integer coordinates (half away from zero).
    pub fn to_vec2i(self) -> Vec2i {
        Vec2i::new(self.x.round() as i32, self.y.round() as i32)
    }
}

impl Index<usize> for Vec2 {
    type Output = f32;

    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Vec2 index out of range: {i}"),
        }
    }
}

impl IndexMut<usize> for Vec2 {
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => panic!("Vec2 index out of range: {i}"),
        }
    }
}

impl Add<Vec2> for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vec2> for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: f32) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

/// 2D integer vector for pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add<Vec2i> for Vec2i {
    type Output = Vec2i;

    fn add(self, rhs: Vec2i) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vec2i> for Vec2i {
    type Output = Vec2i;

    fn sub(self, rhs: Vec2i) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<Vec2i> for Vec2 {
    fn from(v: Vec2i) -> Self {
        Vec2::new(v.x as f32, v.y as f32)
    }
}

/// Texture coordinate in `[0, 1]`, kept apart from positions on purpose.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Uv {
    pub u: f32,
    pub v: f32,
}

impl Uv {
    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}

impl From<Vec2> for Uv {
    fn from(v: Vec2) -> Self {
        Uv::new(v.x, v.y)
    }
}

impl From<Uv> for Vec2 {
    fn from(uv: Uv) -> Self {
        Vec2::new(uv.u, uv.v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_to_integer_coordinates() {
        assert_eq!(Vec2::new(1.4, 2.5).to_vec2i(), Vec2i::new(1, 3));
        assert_eq!(Vec2::new(-1.6, 0.49).to_vec2i(), Vec2i::new(-2, 0));
    }

    #[test]
    fn index_access_matches_fields() {
        let mut v = Vec2::new(3.0, 4.0);
        assert_eq!(v[0], 3.0);
        v[1] = 7.0;
        assert_eq!(v.y, 7.0);
        assert_eq!(v.get(2), None);
    }

    #[test]
    #[should_panic]
    fn index_out_of_range_panics() {
        let v = Vec2::ZERO;
        let _ = v[2];
    }
}
