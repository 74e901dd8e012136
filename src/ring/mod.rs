//! # Modular Integer Ring
//!
//! `ModRing<M>` is the ring of integers modulo `M`. With a prime modulus it is a
//! finite field, which makes it the natural scalar for exact elimination and
//! inversion: results compare equal without any tolerance.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Sub, SubAssign};

use num_traits::{One, Zero};

use crate::utils::{Scalar, ScalarClass};

/// Integer residue modulo `M`.
///
/// `M` must be at least 2; smaller moduli are rejected when the type is
/// instantiated:
///
/// ```compile_fail
/// use dense_algebra::ModRing;
///
/// let _ = ModRing::<1>::new(0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModRing<const M: u32> {
    value: u32,
}

impl<const M: u32> ModRing<M> {
    const VALID_MODULUS: () = assert!(M >= 2, "ModRing modulus must be at least 2");

    pub fn new(value: u32) -> Self {
        let () = Self::VALID_MODULUS;
        ModRing { value: value % M }
    }

    /// Reduces a signed integer into `0..M`.
    pub fn from_signed(value: i64) -> Self {
        let () = Self::VALID_MODULUS;
        ModRing {
            value: value.rem_euclid(M as i64) as u32,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Multiplicative inverse via the extended Euclidean algorithm.
    /// `None` when `self` shares a factor with the modulus.
    pub fn inverse(self) -> Option<Self> {
        let (mut r0, mut r1) = (M as i64, self.value as i64);
        let (mut t0, mut t1) = (0i64, 1i64);
        while r1 != 0 {
            let q = r0 / r1;
            (r0, r1) = (r1, r0 - q * r1);
            (t0, t1) = (t1, t0 - q * t1);
        }
        if r0 != 1 {
            return None;
        }
        Some(Self::from_signed(t0))
    }
}

impl<const M: u32> Default for ModRing<M> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const M: u32> From<u32> for ModRing<M> {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl<const M: u32> Add for ModRing<M> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        ModRing {
            value: ((self.value as u64 + rhs.value as u64) % M as u64) as u32,
        }
    }
}

impl<const M: u32> Sub for ModRing<M> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        ModRing {
            value: ((self.value as u64 + M as u64 - rhs.value as u64) % M as u64) as u32,
        }
    }
}

impl<const M: u32> Mul for ModRing<M> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        ModRing {
            value: ((self.value as u64 * rhs.value as u64) % M as u64) as u32,
        }
    }
}

impl<const M: u32> Div for ModRing<M> {
    type Output = Self;

    /// Multiplies by the inverse of `rhs`.
    ///
    /// # Panics
    /// When `rhs` is not a unit modulo `M`, in the same way integer division
    /// by zero panics.
    fn div(self, rhs: Self) -> Self {
        match rhs.inverse() {
            Some(inv) => self * inv,
            None => panic!("{} is not invertible modulo {}", rhs.value, M),
        }
    }
}

impl<const M: u32> AddAssign for ModRing<M> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<const M: u32> SubAssign for ModRing<M> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<const M: u32> MulAssign for ModRing<M> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<const M: u32> Zero for ModRing<M> {
    fn zero() -> Self {
        let () = Self::VALID_MODULUS;
        ModRing { value: 0 }
    }

    fn is_zero(&self) -> bool {
        self.value == 0
    }
}

impl<const M: u32> One for ModRing<M> {
    fn one() -> Self {
        Self::new(1)
    }
}

impl<const M: u32> Scalar for ModRing<M> {
    const CLASS: ScalarClass = ScalarClass::Modular;

    fn to_real(self) -> Option<f64> {
        None
    }

    fn from_real(_value: f64) -> Option<Self> {
        None
    }
}

impl<const M: u32> fmt::Display for ModRing<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}
