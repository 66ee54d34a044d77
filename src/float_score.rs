use std::cmp::Eq;
use std::fmt::Debug;

use derive_more::Display;
use num_traits::Bounded;
use num_traits::Zero;
use ordered_float::OrderedFloat;

use crate::score::Score;

/// A totally ordered `f64` score.
///
/// Wraps [`OrderedFloat`] so float-valued objectives can live in the same
/// heaps and incumbents as the integer ones. `min_value()` is `-inf`, which
/// doubles as the "no incumbent" sentinel.
#[derive(Copy, Clone, Default, Debug, Display)]
#[repr(transparent)]
#[display("{_0}")]
pub struct FloatScore(pub OrderedFloat<f64>);

impl FloatScore {
    #[must_use]
    pub fn new(f: f64) -> Self {
        Self(OrderedFloat(f))
    }

    #[inline(always)]
    #[must_use]
    pub fn get(self) -> f64 {
        self.0.0
    }

    #[inline(always)]
    #[must_use]
    pub fn neg_infinity() -> Self {
        Self(OrderedFloat(f64::NEG_INFINITY))
    }
}

impl Score for FloatScore {
    #[inline(always)]
    fn scale(self, n: usize) -> Self {
        Self(OrderedFloat(self.0.0 * n as f64))
    }

    #[inline(always)]
    fn as_f64(self) -> f64 {
        self.0.0
    }
}

impl std::ops::Add for FloatScore {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}
impl std::ops::Sub for FloatScore {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}
impl std::ops::AddAssign for FloatScore {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Zero for FloatScore {
    #[inline(always)]
    fn is_zero(&self) -> bool {
        self.0 == OrderedFloat::zero()
    }
    #[inline(always)]
    fn zero() -> Self {
        Self(OrderedFloat::zero())
    }
}
impl Bounded for FloatScore {
    fn min_value() -> Self {
        Self::neg_infinity()
    }
    fn max_value() -> Self {
        Self(OrderedFloat(f64::INFINITY))
    }
}

impl PartialOrd for FloatScore {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for FloatScore {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // `Ord` is forwarded to `OrderedFloat`
        self.0.cmp(&other.0)
    }
}
impl PartialEq for FloatScore {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}
impl Eq for FloatScore {}
