//! Traversal over the packed, variably-sized sequence of transfer entries.
//! Grounded on `transfer_list.c`'s `transfer_list_next` / `transfer_list_prev`:
//! every step re-derives bounds from the current entry's own header fields,
//! so a corrupt or truncated entry simply ends the walk rather than reading
//! past `size`.

use core::ptr::NonNull;

use crate::arith::{add_overflow, add_with_round_up_overflow};
use crate::entry::RawEntry;
use crate::header::GRANULE;

/// Returns the entry following `last` (or the first entry, if `last` is
/// `None`), or `None` if there is no such entry or the walk would run past
/// `size` bytes from `base`.
///
/// # Safety
///
/// `base` must be valid for reads of `size` bytes, and `last`, if given,
/// must be a pointer previously returned by [`next`] or [`prev`] for this
/// same `base`/`size`/`hdr_size`.
pub(crate) unsafe fn next(
    base: NonNull<u8>,
    size: u32,
    hdr_size: u8,
    last: Option<NonNull<u8>>,
) -> Option<NonNull<u8>> {
    let tl_addr = base.as_ptr() as usize;
    let tl_ev = add_overflow(tl_addr, size as usize)?;

    let va = match last {
        Some(last_ptr) => {
            // SAFETY: `last_ptr` was previously validated as an in-bounds entry.
            let last_entry = unsafe { RawEntry::read(last_ptr) };
            let sz = add_overflow(last_entry.hdr_size() as usize, last_entry.data_size() as usize)?;
            add_with_round_up_overflow(last_ptr.as_ptr() as usize, sz, GRANULE)?
        }
        None => add_overflow(tl_addr, hdr_size as usize)?,
    };

    if add_overflow(va, core::mem::size_of::<RawEntry>())? > tl_ev {
        return None;
    }

    let te_ptr = NonNull::new(va as *mut u8)?;
    // SAFETY: bounds above guarantee `size_of::<RawEntry>()` readable bytes at `va`.
    let te = unsafe { RawEntry::read(te_ptr) };

    if (te.hdr_size() as usize) < core::mem::size_of::<RawEntry>() {
        return None;
    }

    let sz = add_overflow(te.hdr_size() as usize, te.data_size() as usize)?;
    let ev = add_overflow(va, sz)?;
    if ev > tl_ev {
        return None;
    }

    Some(te_ptr)
}

/// Returns the entry preceding `last`, found by walking forward from the
/// start of the list, or `None` if `last` is not reachable this way.
///
/// # Safety
///
/// Same preconditions as [`next`].
pub(crate) unsafe fn prev(
    base: NonNull<u8>,
    size: u32,
    hdr_size: u8,
    last: NonNull<u8>,
) -> Option<NonNull<u8>> {
    let mut prev;
    let mut te: Option<NonNull<u8>> = None;

    loop {
        prev = te;
        // SAFETY: forwarded from caller's preconditions.
        te = unsafe { next(base, size, hdr_size, te) };
        match te {
            Some(ptr) if ptr == last => return prev,
            Some(_) => continue,
            None => return None,
        }
    }
}
