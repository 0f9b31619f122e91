//! Small integer helpers shared by the transform and the container code.

/// Returns the largest power of two that is `<= n`, or 0 when `n == 0`.
///
/// # Examples
///
/// ```
/// use wtf_codec::utils::math::sup_power_of_two;
///
/// assert_eq!(sup_power_of_two(7), 4);
/// assert_eq!(sup_power_of_two(8), 8);
/// assert_eq!(sup_power_of_two(0), 0);
/// ```
#[inline]
pub fn sup_power_of_two(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}

/// `pow(2, level)`: the number of samples aggregated by one leaf at a level
/// of loss. Saturates at `usize::MAX` for levels past the word size.
#[inline]
pub fn block_size(level: u16) -> usize {
    if u32::from(level) >= usize::BITS {
        usize::MAX
    } else {
        1 << level
    }
}
