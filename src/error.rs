//! Construction-boundary errors. The engine's own operations report failure
//! via `Option`/`bool`/[`crate::header::CheckResult`] per the handoff
//! protocol's design (see `transfer_list.h`); this type exists only for the
//! safe constructors, which must reject a caller-supplied region before a
//! `TransferList` can exist at all.

/// Why a raw memory region was rejected as a transfer list backing store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitError {
    /// The pointer was null, or the region's length was zero.
    NullOrZero,
    /// The start address is not aligned to the initial maximum alignment.
    Misaligned,
    /// The region is too small to hold even an empty header.
    TooSmall,
}

impl core::fmt::Display for InitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Self::NullOrZero => "region pointer is null or length is zero",
            Self::Misaligned => "region start is not aligned to the initial maximum alignment",
            Self::TooSmall => "region is smaller than a transfer list header",
        };
        f.write_str(msg)
    }
}
