//! Byte-sum checksum over a transfer list's used region. Grounded on
//! `transfer_list.c`'s `calc_byte_sum` / `transfer_list_update_checksum` /
//! `transfer_list_verify_checksum`: the region (header plus every TE, up to
//! `size`) must sum to zero, modulo 256, whenever `HAS_CHECKSUM` is set.

/// Sums every byte in `region`, wrapping modulo 256.
#[inline]
#[must_use]
pub(crate) fn byte_sum(region: &[u8]) -> u8 {
    region.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Computes the checksum byte that makes `byte_sum(region)` equal zero,
/// given `region`'s checksum byte currently holds `old_checksum`.
#[inline]
#[must_use]
pub(crate) fn updated_checksum(region: &[u8], old_checksum: u8) -> u8 {
    let without_old = byte_sum(region).wrapping_sub(old_checksum);
    0u8.wrapping_sub(without_old)
}

/// True if `region`'s byte sum is zero.
#[inline]
#[must_use]
pub(crate) fn verify(region: &[u8]) -> bool {
    byte_sum(region) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_sum_wraps_modulo_256() {
        assert_eq!(byte_sum(&[1, 2, 3]), 6);
        assert_eq!(byte_sum(&[0xff, 0xff, 0xff]), 0xff_u8.wrapping_mul(3));
    }

    #[test]
    fn updated_checksum_makes_region_sum_to_zero() {
        let mut region = [0x12, 0x34, 0x56, 0x00];
        let cs = updated_checksum(&region, region[3]);
        region[3] = cs;
        assert!(verify(&region));
    }

    #[test]
    fn verify_detects_corruption() {
        let mut region = [0x12, 0x34, 0x56, 0x00];
        region[3] = updated_checksum(&region, region[3]);
        assert!(verify(&region));
        region[0] ^= 0xff;
        assert!(!verify(&region));
    }
}
