// CLASSIFICATION: COMMUNITY
// Filename: fixed_point.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-03-18

//! 17.14 fixed-point arithmetic for scheduler accounting (load average,
//! recent-cpu). Pure integer math; products and quotients go through i64 so
//! intermediate values cannot overflow the 32-bit representation.

use std::ops::{Add, Div, Mul, Sub};

const SHIFT: i32 = 14;
const F: i32 = 1 << SHIFT;

/// A signed 17.14 fixed-point value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fixed(i32);

impl Fixed {
    pub fn from_int(n: i32) -> Self {
        Fixed(n * F)
    }

    /// Convert to integer, rounding toward zero.
    pub fn trunc(self) -> i32 {
        self.0 / F
    }

    /// Convert to integer, rounding to nearest.
    pub fn round(self) -> i32 {
        if self.0 >= 0 {
            (self.0 + F / 2) / F
        } else {
            (self.0 - F / 2) / F
        }
    }

    pub fn add_int(self, n: i32) -> Self {
        Fixed(self.0 + n * F)
    }

    pub fn sub_int(self, n: i32) -> Self {
        Fixed(self.0 - n * F)
    }

    pub fn mul_int(self, n: i32) -> Self {
        Fixed(self.0 * n)
    }

    pub fn div_int(self, n: i32) -> Self {
        Fixed(self.0 / n)
    }

    /// Raw 17.14 representation.
    pub fn raw(self) -> i32 {
        self.0
    }
}

impl Add for Fixed {
    type Output = Fixed;
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 + rhs.0)
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 - rhs.0)
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed((i64::from(self.0) * i64::from(rhs.0) / i64::from(F)) as i32)
    }
}

impl Div for Fixed {
    type Output = Fixed;
    fn div(self, rhs: Fixed) -> Fixed {
        Fixed((i64::from(self.0) * i64::from(F) / i64::from(rhs.0)) as i32)
    }
}
