//! Immutable 2D vector used for positions, velocities and forces.
//!
//! Screen convention: x grows to the right, y grows downward, so a rising
//! projectile has negative vertical velocity.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Checked constructor for values arriving from outside the simulation
    /// (path samples, click positions). Rejects NaN and infinities.
    pub fn try_new(x: f64, y: f64) -> Result<Self> {
        if x.is_finite() && y.is_finite() {
            Ok(Self { x, y })
        } else {
            Err(Error::InvalidOperand { x, y })
        }
    }

    pub fn from_polar(angle: f64, magnitude: f64) -> Self {
        Self {
            x: angle.cos() * magnitude,
            y: angle.sin() * magnitude,
        }
    }

    pub fn from_cartesian(x: f64, y: f64) -> Self {
        Self::new(x, y)
    }

    pub fn dot(self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn plus(self, other: Vector) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn minus(self, other: Vector) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }

    pub fn divide(self, scalar: f64) -> Self {
        Self::new(self.x / scalar, self.y / scalar)
    }

    pub fn magnitude(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn with_magnitude(self, magnitude: f64) -> Self {
        Self::from_polar(self.angle(), magnitude)
    }

    pub fn with_angle(self, angle: f64) -> Self {
        Self::from_polar(angle, self.magnitude())
    }

    /// Unit vector in the same direction. The zero vector has no direction
    /// and is returned unchanged.
    pub fn normalized(self) -> Self {
        let magnitude = self.magnitude();
        if magnitude == 0.0 {
            self
        } else {
            self.divide(magnitude)
        }
    }

    pub fn distance(self, other: Vector) -> f64 {
        self.minus(other).magnitude()
    }

    /// Exact component equality.
    pub fn equal(self, other: Vector) -> bool {
        self.x == other.x && self.y == other.y
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        self.plus(rhs)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        *self = self.plus(rhs);
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        self.minus(rhs)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        self.multiply(rhs)
    }
}

impl Div<f64> for Vector {
    type Output = Vector;

    fn div(self, rhs: f64) -> Vector {
        self.divide(rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

impl From<kurbo::Point> for Vector {
    fn from(point: kurbo::Point) -> Self {
        Vector::new(point.x, point.y)
    }
}
