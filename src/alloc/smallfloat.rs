//! Bijection between byte sizes and 8-bit size-class bucket indices.
//!
//! Buckets follow a floating point style layout (3-bit mantissa, 5-bit
//! exponent) so that the relative overhead of rounding a size up to its
//! bucket stays bounded across the whole `u32` range instead of growing
//! linearly the way fixed-width buckets would.

/// Bits of mantissa kept in the bucket encoding.
const MANTISSA_BITS: u32 = 3;
/// `1 << MANTISSA_BITS`; also the start of the "normal" (non-denormal) range.
const MANTISSA_VALUE: u32 = 1 << MANTISSA_BITS;
const MANTISSA_MASK: u32 = MANTISSA_VALUE - 1;

/// Smallest bucket `b` with `bucket_size(b) >= size`.
///
/// Used when choosing which bucket to search for an allocation: rounding up
/// guarantees that any node popped from a bucket `>= bucket_round_up(size)`
/// is large enough to satisfy the request.
pub fn bucket_round_up(size: u32) -> u32 {
    if size < MANTISSA_VALUE {
        return size;
    }

    let highest_set_bit = 31 - size.leading_zeros();
    let mantissa_start_bit = highest_set_bit - MANTISSA_BITS;
    let mut exp = mantissa_start_bit + 1;
    let mut mantissa = (size >> mantissa_start_bit) & MANTISSA_MASK;

    let low_bits_mask = (1u32 << mantissa_start_bit) - 1;
    if size & low_bits_mask != 0 {
        mantissa += 1;
        if mantissa > MANTISSA_MASK {
            // Mantissa overflowed into the hidden bit: bump the exponent and
            // reset to the smallest mantissa of the next exponent.
            mantissa = 0;
            exp += 1;
        }
    }

    (exp << MANTISSA_BITS) + mantissa
}

/// Largest bucket `b` with `bucket_size(b) <= size`.
///
/// Used when inserting a free node into a bucket: truncating (rather than
/// rounding up) ensures the node's real size never undershoots the bucket it
/// is filed under.
pub fn bucket_round_down(size: u32) -> u32 {
    if size < MANTISSA_VALUE {
        return size;
    }

    let highest_set_bit = 31 - size.leading_zeros();
    let mantissa_start_bit = highest_set_bit - MANTISSA_BITS;
    let exp = mantissa_start_bit + 1;
    let mantissa = (size >> mantissa_start_bit) & MANTISSA_MASK;

    (exp << MANTISSA_BITS) | mantissa
}

/// Inverse of the encoding: the byte size a bucket index represents.
pub fn bucket_size(bucket: u32) -> u32 {
    let exponent = bucket >> MANTISSA_BITS;
    let mantissa = bucket & MANTISSA_MASK;

    if exponent == 0 {
        mantissa
    } else {
        (mantissa | MANTISSA_VALUE) << (exponent - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denormal_range_is_identity() {
        for size in 0..MANTISSA_VALUE {
            assert_eq!(bucket_round_up(size), size);
            assert_eq!(bucket_round_down(size), size);
            assert_eq!(bucket_size(size), size);
        }
    }

    #[test]
    fn round_trip_monotonicity() {
        for size in 1u32..=1_000_000 {
            let up = bucket_round_up(size);
            let down = bucket_round_down(size);
            assert!(up >= down, "size={size} up={up} down={down}");
            assert!(bucket_size(down) <= size, "size={size} down={down}");
            assert!(bucket_size(up) >= size, "size={size} up={up}");
        }
    }

    #[test]
    fn exact_bucket_sizes_round_trip_without_growth() {
        for bucket in 0u32..256 {
            let size = bucket_size(bucket);
            if size == 0 {
                continue;
            }
            assert_eq!(bucket_round_down(size), bucket);
        }
    }

    #[test]
    fn mantissa_overflow_carries_into_exponent() {
        // 0xFFFFFFFF has every bit below the mantissa window set, so rounding
        // up must carry the mantissa into the next exponent rather than
        // wrapping mod 8.
        let up = bucket_round_up(u32::MAX);
        assert!(bucket_size(up) >= u32::MAX / 2);
    }

    #[test]
    fn worst_case_overhead_is_bounded() {
        // Rounding up to a bucket should never inflate a normal-range size by
        // more than ~12.5% (one mantissa step out of 8).
        for size in MANTISSA_VALUE..=1_000_000 {
            let rounded = bucket_size(bucket_round_up(size));
            assert!(
                (rounded as f64) <= (size as f64) * 1.125 + 1.0,
                "size={size} rounded={rounded}"
            );
        }
    }
}
