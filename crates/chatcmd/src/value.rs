//! Runtime values produced by argument matchers.
//!
//! Every matcher that contributes a positional argument wraps what it parsed
//! in an [`ArgValue`]. Handlers receive the values in grammar order and can
//! destructure them with the `as_*` extractors.

use serde::Serialize;

/// A 3D vector / world position.
///
/// Used both for resolved positions and for the sender's view direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Creates a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    /// Component-wise addition.
    pub fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Scales every component by `factor`.
    pub fn scale(self, factor: f64) -> Vec3 {
        Vec3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// The cross product `self × other`.
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }
}

impl std::ops::Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3::add(self, other)
    }
}

/// A positional argument extracted during dispatch.
///
/// The variant is fixed by the matcher that produced the value: `number`
/// arguments yield [`ArgValue::Number`], `string` arguments yield
/// [`ArgValue::String`], `position` arguments yield [`ArgValue::Position`].
/// Custom matchers pick whichever variant fits their parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ArgValue {
    /// A parsed floating-point number.
    Number(f64),
    /// A parsed (possibly quoted) string token.
    String(String),
    /// A resolved world position.
    Position(Vec3),
}

impl ArgValue {
    /// Returns the numeric value, if this is a `Number`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ArgValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string value, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the position value, if this is a `Position`.
    pub fn as_position(&self) -> Option<Vec3> {
        match self {
            ArgValue::Position(p) => Some(*p),
            _ => None,
        }
    }
}
