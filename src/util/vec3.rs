use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

use crate::util::vec2::Vec2;

/// World-space vector. Y is vertical.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Lift a planar vector to world space at height `y`
    #[inline]
    pub fn from_planar(planar: Vec2, y: f32) -> Self {
        Self {
            x: planar.x,
            y,
            z: planar.z,
        }
    }

    /// Projection onto the ground plane
    #[inline]
    pub fn planar(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    /// Replace the horizontal components, keeping the vertical one
    #[inline]
    pub fn with_planar(&self, planar: Vec2) -> Self {
        Self {
            x: planar.x,
            y: self.y,
            z: planar.z,
        }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
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
