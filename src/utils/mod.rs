use std::fmt::Debug;
use std::ops::{Div, Sub};

use num_traits::{NumCast, One, ToPrimitive, Zero};

/// Coarse classification of a scalar type, used to decide which metric
/// operations (norm, unit vector, angle) make sense for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarClass {
    /// Floating point; every operation is available.
    Real,
    /// Integers; norms are fine, normalization would truncate.
    Integral,
    /// Residue classes and other non-ordered rings; no metric at all.
    Modular,
}

/// Arithmetic capability required from matrix and vector entries.
///
/// The elimination family (`gauss_jordan`, `determinant`, `invert`) divides
/// by pivots and therefore only gives meaningful results when `Self` is a
/// field. Integer scalars are accepted structurally; their divisions truncate.
pub trait Scalar:
    Copy + PartialEq + Debug + Zero + One + Sub<Output = Self> + Div<Output = Self> + Send + Sync
{
    const CLASS: ScalarClass;

    /// Lossy conversion used by `norm` and `angle`. `None` when the value has
    /// no meaningful real counterpart.
    fn to_real(self) -> Option<f64>;

    /// Inverse of [`Scalar::to_real`], used by `unit`.
    fn from_real(value: f64) -> Option<Self>;

    /// Additive inverse expressed through subtraction, so unsigned-like and
    /// modular types need no `Neg` impl.
    fn negate(self) -> Self {
        Self::zero() - self
    }
}

macro_rules! impl_scalar {
    ($class:expr; $($t:ty),*) => {
        $(
            impl Scalar for $t {
                const CLASS: ScalarClass = $class;

                fn to_real(self) -> Option<f64> {
                    ToPrimitive::to_f64(&self)
                }

                fn from_real(value: f64) -> Option<Self> {
                    <$t as NumCast>::from(value)
                }
            }
        )*
    };
}

impl_scalar!(ScalarClass::Real; f32, f64);
impl_scalar!(ScalarClass::Integral; i8, i16, i32, i64, i128, isize);
