/// Values produced by a score function.
///
/// Graph objectives count distances or covered nodes and use `i64`; the
/// k-medoid objective sums Euclidean distances and uses
/// [`crate::float_score::FloatScore`]. Either way the search only needs a
/// totally ordered numeric type with a `min_value()` sentinel standing in for
/// "no incumbent yet".
pub trait Score:
    Copy
    + std::fmt::Debug
    + std::fmt::Display
    + PartialEq
    + core::cmp::Eq
    + PartialOrd
    + Ord
    + num_traits::Zero
    + num_traits::Bounded
    + std::ops::Add<Self, Output = Self>
    + std::ops::Sub<Self, Output = Self>
    + std::ops::AddAssign
{
    /// The score repeated `n` times, for width-style bounds.
    #[must_use]
    fn scale(self, n: usize) -> Self;

    /// Lossy view used only at the serialization boundary.
    #[must_use]
    fn as_f64(self) -> f64;

    /// The sentinel that every real score beats.
    #[inline(always)]
    #[must_use]
    fn lowest() -> Self {
        num_traits::Bounded::min_value()
    }
}

impl Score for i64 {
    #[inline(always)]
    fn scale(self, n: usize) -> Self {
        self * n as i64
    }

    #[inline(always)]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowest_is_beaten_by_everything() {
        assert!(i64::lowest() < -1_000_000);
        assert!(i64::lowest() < 0);
    }

    #[test]
    fn scaling() {
        assert_eq!(7i64.scale(3), 21);
        assert_eq!((-2i64).scale(5), -10);
        assert_eq!(0i64.scale(100), 0);
    }
}
