//! Unsigned integer types the tree can route.

/// An unsigned integer that can be routed through a [`RadixTree`](crate::RadixTree).
///
/// Routing is done on the widened `u64` form. `from_u64` is only ever called
/// with values that were produced by `to_u64` on the same type, so the
/// narrowing never truncates.
///
/// Capacities are powers of two held in a `u64`, so the largest capacity is
/// 2^63 and only values below 2^63 can be sorted. A larger `u64` or `usize`
/// value makes the sort fail with
/// [`SortError::CapacityOverflow`](crate::SortError::CapacityOverflow).
pub trait TreeKey: Copy {
    /// Largest representable value, used to bound capacity derivation.
    const MAX: u64;

    fn to_u64(self) -> u64;

    fn from_u64(value: u64) -> Self;
}

macro_rules! impl_tree_key {
    ($($t:ty),*) => {
        $(
            impl TreeKey for $t {
                const MAX: u64 = <$t>::MAX as u64;

                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn from_u64(value: u64) -> Self {
                    debug_assert!(value <= <Self as TreeKey>::MAX);
                    value as $t
                }
            }
        )*
    };
}

impl_tree_key!(u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_keeps_value() {
        assert_eq!(u8::MAX.to_u64(), 255);
        assert_eq!(u16::from_u64(65_535), u16::MAX);
        assert_eq!(<u32 as TreeKey>::MAX, u32::MAX as u64);
        assert_eq!(u64::from_u64(u64::MAX), u64::MAX);
    }
}
