//! Minimal owned vector types used by the control core
//!
//! The renderer has its own math types; these exist so the control core stays
//! independent of it. Every normalization goes through `normalize_or_zero`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Lengths below this are treated as zero when normalizing
pub const NORMALIZE_EPSILON: f32 = 1e-6;

/// 3-component vector (Y up)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction, or zero for degenerate input
    pub fn normalize_or_zero(self) -> Self {
        let len = self.length();
        if len > NORMALIZE_EPSILON && len.is_finite() {
            self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    /// Rescale to `max_len` if longer, preserving direction
    pub fn clamp_length_max(self, max_len: f32) -> Self {
        let len = self.length();
        if len > max_len && len > NORMALIZE_EPSILON {
            self * (max_len / len)
        } else {
            self
        }
    }

    /// Drop the vertical component
    pub fn flatten(self) -> Self {
        Self::new(self.x, 0.0, self.z)
    }

    pub fn lerp(self, rhs: Self, t: f32) -> Self {
        self + (rhs - self) * t
    }

    pub fn distance(self, rhs: Self) -> f32 {
        (rhs - self).length()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// 2-component vector for screen-space and stick values
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Rescale to `max_len` if longer, preserving direction
    pub fn clamp_length_max(self, max_len: f32) -> Self {
        let len = self.length();
        if len > max_len && len > NORMALIZE_EPSILON {
            self * (max_len / len)
        } else {
            self
        }
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Wrap an angle difference into [-PI, PI]
pub fn wrap_angle(a: f32) -> f32 {
    a.sin().atan2(a.cos())
}

/// Frame-rate independent exponential approach factor
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_zero_is_guarded() {
        assert_eq!(Vec3::ZERO.normalize_or_zero(), Vec3::ZERO);
        let tiny = Vec3::new(1e-9, 0.0, 0.0);
        assert_eq!(tiny.normalize_or_zero(), Vec3::ZERO);
        let n = Vec3::new(3.0, 0.0, 4.0).normalize_or_zero();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_up_cross_forward_is_right() {
        // up x forward(+Z) = +X
        let right = Vec3::Y.cross(Vec3::new(0.0, 0.0, 1.0));
        assert!((right.x - 1.0).abs() < 1e-6);
        assert!(right.y.abs() < 1e-6 && right.z.abs() < 1e-6);
    }

    #[test]
    fn test_clamp_length_preserves_direction() {
        let v = Vec3::new(6.0, 0.0, 8.0).clamp_length_max(5.0);
        assert!((v.length() - 5.0).abs() < 1e-5);
        assert!((v.x / v.z - 0.75).abs() < 1e-5);

        let short = Vec2::new(1.0, 1.0);
        assert_eq!(short.clamp_length_max(5.0), short);
    }

    #[test]
    fn test_wrap_angle_takes_short_way() {
        let d = wrap_angle(3.0 * PI / 2.0);
        assert!((d + PI / 2.0).abs() < 1e-5);
        let d = wrap_angle(-3.0 * PI / 2.0);
        assert!((d - PI / 2.0).abs() < 1e-5);
    }
}
