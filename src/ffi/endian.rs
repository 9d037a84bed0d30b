//! # Endianness Utilities
//!
//! This module provides utilities to safely deal with foreign-endian types.
//! Trimmed to the one wrapped width the transfer list wire format actually
//! uses: `u32`.

/// A trait to convert to and from the native endianness to the endianness of
/// a specific type.
///
/// ## Safety
///
/// This trait requires the implementation to guarantee the size of `Self`
/// equals that of `Raw`, and that `Self` can be created from, and read back
/// as, the memory contents of `Raw`.
pub unsafe trait NativeEndian<Raw> {
    /// Creates the foreign-ordered value from a native value, converting the
    /// value before retaining it, if required.
    #[must_use]
    fn from_native(native: Raw) -> Self;

    /// Returns the native representation of the value behind this wrapping
    /// object, converting it first, if required.
    #[must_use]
    fn into_native(self) -> Raw;
}

/// A type to represent values encoded as little-endian. It is a simple
/// wrapping-structure with the same alignment and size requirements as the
/// type it wraps.
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct LittleEndian<Raw>(Raw);

impl<Raw> LittleEndian<Raw>
where
    Self: NativeEndian<Raw>,
{
    /// Creates the foreign-ordered value from a native value, converting the
    /// value before retaining it, if required.
    #[must_use]
    pub fn from_native(native: Raw) -> Self {
        <Self as NativeEndian<Raw>>::from_native(native)
    }

    /// Returns the native representation of the value behind this wrapping
    /// object, converting it first, if required.
    #[must_use]
    pub fn into_native(self) -> Raw {
        <Self as NativeEndian<Raw>>::into_native(self)
    }
}

// Implement `NativeEndian` on little-endian integers via `from/to_le()`.
unsafe impl NativeEndian<u32> for LittleEndian<u32> {
    #[inline]
    fn from_native(native: u32) -> Self {
        Self(native.to_le())
    }

    #[inline]
    fn into_native(self) -> u32 {
        u32::from_le(self.0)
    }
}

impl<Raw> core::fmt::Debug for LittleEndian<Raw>
where
    Self: NativeEndian<Raw> + Copy,
    Raw: core::fmt::Debug,
{
    fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        fmt.debug_tuple("LittleEndian").field(&(*self).into_native()).finish()
    }
}

impl<Raw> core::default::Default for LittleEndian<Raw>
where
    Self: NativeEndian<Raw>,
    Raw: Copy + core::default::Default,
{
    fn default() -> Self {
        Self::from_native(Default::default())
    }
}

impl<Raw> core::cmp::PartialEq for LittleEndian<Raw>
where
    Self: NativeEndian<Raw> + Copy,
    Raw: core::cmp::PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        (*self).into_native().eq(&(*other).into_native())
    }
}

impl<Raw> core::cmp::Eq for LittleEndian<Raw>
where
    Self: NativeEndian<Raw> + Copy,
    Raw: core::cmp::Eq,
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let v = LittleEndian::<u32>::from_native(0x1234_5678);
        assert_eq!(v.into_native(), 0x1234_5678);
    }

    #[test]
    fn wire_bytes_are_little_endian() {
        let v = LittleEndian::<u32>::from_native(0x0102_0304);
        let bytes: [u8; 4] = unsafe { core::mem::transmute(v) };
        assert_eq!(bytes, [0x04, 0x03, 0x02, 0x01]);
    }
}
