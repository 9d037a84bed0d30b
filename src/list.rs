//! The core transfer list engine: construction, header validation,
//! relocation, and entry insertion/removal/resizing. Grounded on
//! `transfer_list.c`'s `transfer_list_init` / `_check_header` /
//! `_relocate` / `_ensure` / `_add` / `_add_with_align` / `_rem` /
//! `_set_data_size`.
//!
//! The engine operates through a raw pointer rather than a `&mut [u8]`
//! slice: [`TransferList::relocate`] must `memmove` the list to a new,
//! possibly-overlapping address, which two live `&mut` slices could never
//! express without triggering undefined behavior.

use core::marker::PhantomData;
use core::mem::size_of;
use core::ptr::NonNull;

use crate::arith::{add_overflow, add_with_round_up_overflow, is_aligned, round_up_overflow};
use crate::checksum;
use crate::entry::{tag, RawEntry};
use crate::error::InitError;
use crate::ffi::LittleEndian;
use crate::header::{CheckResult, Flags, RawHeader, GRANULE, INIT_MAX_ALIGN, SIGNATURE, VERSION};
use crate::walk;

#[inline]
fn addr(ptr: NonNull<u8>) -> usize {
    ptr.as_ptr() as usize
}

#[inline]
fn ptr_at(address: usize) -> Option<NonNull<u8>> {
    NonNull::new(address as *mut u8)
}

/// A transfer list backed by a caller-supplied memory region.
///
/// Borrows the region for `'a`, the lifetime every [`TransferEntry`] it
/// hands out is also tied to.
pub struct TransferList<'a> {
    pub(crate) base: NonNull<u8>,
    _marker: PhantomData<&'a mut [u8]>,
}

/// A handle to one transfer entry within a [`TransferList`].
#[derive(Clone, Copy)]
pub struct TransferEntry<'a> {
    pub(crate) ptr: NonNull<u8>,
    _marker: PhantomData<&'a mut [u8]>,
}

impl PartialEq for TransferEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}
impl Eq for TransferEntry<'_> {}

impl<'a> TransferList<'a> {
    fn check_header_raw(base: NonNull<u8>) -> CheckResult {
        // SAFETY: callers of every public constructor have already validated
        // that `base` is readable for at least `size_of::<RawHeader>()` bytes.
        let header = unsafe { RawHeader::read(base) };

        if header.signature.into_native() != SIGNATURE {
            return CheckResult::Invalid;
        }
        let max_size = header.max_size.into_native();
        if max_size == 0 {
            return CheckResult::Invalid;
        }
        if header.size.into_native() > max_size {
            return CheckResult::Invalid;
        }
        if header.hdr_size as usize != size_of::<RawHeader>() {
            return CheckResult::Invalid;
        }
        if !Self::verify_checksum_raw(base, &header) {
            return CheckResult::Invalid;
        }

        match header.version {
            0 => CheckResult::Invalid,
            v if v == VERSION => CheckResult::All,
            v if v > VERSION => CheckResult::ReadOnly,
            _ => CheckResult::Custom,
        }
    }

    fn verify_checksum_raw(base: NonNull<u8>, header: &RawHeader) -> bool {
        let flags = Flags::from_bits_truncate(header.flags.into_native());
        if !flags.contains(Flags::HAS_CHECKSUM) {
            return true;
        }
        let size = header.size.into_native() as usize;
        // SAFETY: every constructor maintains the invariant `size <= max_size
        // <= region.len()`, so `size` bytes from `base` are in bounds.
        let region = unsafe { core::slice::from_raw_parts(base.as_ptr(), size) };
        checksum::verify(region)
    }

    /// Wraps `region`, which must already hold a transfer list, without
    /// touching its contents. Unlike [`init`](Self::init), this does not
    /// require `region`'s length or start address to be granule-aligned —
    /// only that it's large enough to plausibly hold a header. Call
    /// [`check_header`](Self::check_header) afterwards to confirm the
    /// contents are actually valid before trusting them.
    pub fn attach(region: &'a mut [u8]) -> Result<Self, InitError> {
        if region.is_empty() {
            return Err(InitError::NullOrZero);
        }
        let base = NonNull::new(region.as_mut_ptr()).ok_or(InitError::NullOrZero)?;
        if region.len() < size_of::<RawHeader>() {
            return Err(InitError::TooSmall);
        }
        // SAFETY: region.len() >= size_of::<RawHeader>(), checked above.
        let header = unsafe { RawHeader::read(base) };
        if header.max_size.into_native() as usize > region.len() {
            return Err(InitError::TooSmall);
        }
        Ok(Self {
            base,
            _marker: PhantomData,
        })
    }

    /// Initializes an empty transfer list in `region`. Compliant to §2.4.5
    /// of the Firmware Handoff specification (v0.9).
    pub fn init(region: &'a mut [u8]) -> Option<Self> {
        let len = region.len();
        if len == 0 {
            return None;
        }
        let base = NonNull::new(region.as_mut_ptr())?;
        let align = 1usize << INIT_MAX_ALIGN;
        if !is_aligned(addr(base), align) || !is_aligned(len, align) || len < size_of::<RawHeader>() {
            return None;
        }

        region.fill(0);

        let header = RawHeader {
            signature: LittleEndian::from_native(SIGNATURE),
            checksum: 0,
            version: VERSION,
            hdr_size: size_of::<RawHeader>() as u8,
            alignment: INIT_MAX_ALIGN,
            size: LittleEndian::from_native(size_of::<RawHeader>() as u32),
            max_size: LittleEndian::from_native(len as u32),
            flags: LittleEndian::from_native(Flags::HAS_CHECKSUM.bits()),
            reserved: LittleEndian::default(),
        };
        // SAFETY: `base` was just validated as aligned and `len`-long.
        unsafe { header.write(base) };

        let mut tl = Self {
            base,
            _marker: PhantomData,
        };
        tl.update_checksum();
        log::info!("transfer list initialized: {} bytes at {:p}", len, base.as_ptr());
        Some(tl)
    }

    /// Verifies `region` does not already hold a valid transfer list, then
    /// initializes one. If it does, wraps it as-is instead.
    pub fn ensure(region: &'a mut [u8]) -> Option<Self> {
        let len = region.len();
        if len >= size_of::<RawHeader>() {
            // A read-only probe: the borrow from `as_ptr()` ends with this
            // statement, so `region` is free to move into either branch below.
            let probe = NonNull::new(region.as_ptr() as *mut u8)?;
            let already_valid = unsafe { RawHeader::read(probe) }.max_size.into_native() as usize <= len
                && Self::check_header_raw(probe) == CheckResult::All;
            if already_valid {
                return Self::attach(region).ok();
            }
        }
        Self::init(region)
    }

    /// Checks the validity of the header. Compliant to §2.4.1 of the
    /// Firmware Handoff specification (v0.9).
    pub fn check_header(&self) -> CheckResult {
        Self::check_header_raw(self.base)
    }

    /// Recomputes and stores the checksum, if the list carries one.
    pub fn update_checksum(&mut self) {
        // SAFETY: invariant of every constructor.
        let mut header = unsafe { RawHeader::read(self.base) };
        let flags = Flags::from_bits_truncate(header.flags.into_native());
        if !flags.contains(Flags::HAS_CHECKSUM) {
            return;
        }
        let size = header.size.into_native() as usize;
        // SAFETY: `size <= max_size <= region.len()` by construction.
        let region = unsafe { core::slice::from_raw_parts(self.base.as_ptr(), size) };
        header.checksum = checksum::updated_checksum(region, header.checksum);
        // SAFETY: same region, now writing back the single checksum byte.
        unsafe { header.write(self.base) };
    }

    /// Verifies the stored checksum against the region's contents.
    pub fn verify_checksum(&self) -> bool {
        // SAFETY: invariant of every constructor.
        let header = unsafe { RawHeader::read(self.base) };
        Self::verify_checksum_raw(self.base, &header)
    }

    /// Total size of the list: header plus every entry, in bytes.
    pub fn size(&self) -> u32 {
        unsafe { RawHeader::read(self.base) }.size.into_native()
    }

    /// Size of the backing region, in bytes.
    pub fn max_size(&self) -> u32 {
        unsafe { RawHeader::read(self.base) }.max_size.into_native()
    }

    /// Maximum alignment, as a power-of-two exponent, required by any TE's data.
    pub fn alignment(&self) -> u8 {
        unsafe { RawHeader::read(self.base) }.alignment
    }

    /// The header's flags.
    pub fn flags(&self) -> Flags {
        Flags::from_bits_truncate(unsafe { RawHeader::read(self.base) }.flags.into_native())
    }

    /// Returns the entry following `last`, or the first entry if `last` is
    /// `None`.
    pub fn next(&self, last: Option<&TransferEntry<'a>>) -> Option<TransferEntry<'a>> {
        let header = unsafe { RawHeader::read(self.base) };
        // SAFETY: `self.base`/`header.size` satisfy `walk::next`'s contract
        // by construction; `last`, if given, was returned by this same list.
        unsafe {
            walk::next(
                self.base,
                header.size.into_native(),
                header.hdr_size,
                last.map(|e| e.ptr),
            )
        }
        .map(|ptr| TransferEntry {
            ptr,
            _marker: PhantomData,
        })
    }

    /// Returns the entry preceding `entry`, found by walking from the start
    /// of the list.
    pub fn prev(&self, entry: &TransferEntry<'a>) -> Option<TransferEntry<'a>> {
        let header = unsafe { RawHeader::read(self.base) };
        // SAFETY: see `next`.
        unsafe { walk::prev(self.base, header.size.into_native(), header.hdr_size, entry.ptr) }.map(|ptr| TransferEntry {
            ptr,
            _marker: PhantomData,
        })
    }

    /// Appends a new entry to the tail of the list. Compliant to §2.4.3 of
    /// the Firmware Handoff specification (v0.9).
    pub fn add(&mut self, tag_id: u32, data_size: u32, data: Option<&[u8]>) -> Option<TransferEntry<'a>> {
        if tag_id > tag::MAX {
            return None;
        }

        let header = unsafe { RawHeader::read(self.base) };
        let tl_ev = add_overflow(addr(self.base), header.size.into_native() as usize)?;
        let te_addr = round_up_overflow(tl_ev, GRANULE)?;
        let te_end = round_up_overflow(add_overflow(add_overflow(te_addr, size_of::<RawEntry>())?, data_size as usize)?, GRANULE)?;

        if te_end > addr(self.base) + header.max_size.into_native() as usize {
            return None;
        }

        let te_ptr = ptr_at(te_addr)?;
        let entry = RawEntry::new(tag_id, size_of::<RawEntry>() as u8, data_size);
        // SAFETY: `te_end` was just checked to fit within the region.
        unsafe { entry.write(te_ptr) };

        let mut new_header = header;
        new_header.size = LittleEndian::from_native(header.size.into_native() + (te_end - tl_ev) as u32);
        // SAFETY: invariant of every constructor.
        unsafe { new_header.write(self.base) };

        if let Some(src) = data {
            let copy_len = src.len().min(data_size as usize);
            // SAFETY: `te_ptr + hdr_size .. + data_size` is within the
            // region just reserved above.
            unsafe {
                core::ptr::copy(src.as_ptr(), te_ptr.as_ptr().add(size_of::<RawEntry>()), copy_len);
            }
        }

        self.update_checksum();
        Some(TransferEntry {
            ptr: te_ptr,
            _marker: PhantomData,
        })
    }

    /// Appends a new entry, padding with an empty entry first if needed so
    /// the data starts aligned to `1 << alignment`. Compliant to §2.4.4 of
    /// the Firmware Handoff specification (v0.9).
    pub fn add_with_align(&mut self, tag_id: u32, data_size: u32, data: Option<&[u8]>, alignment: u8) -> Option<TransferEntry<'a>> {
        let header = unsafe { RawHeader::read(self.base) };
        let tl_ev = add_overflow(addr(self.base), header.size.into_native() as usize)?;
        let ev = add_overflow(tl_ev, size_of::<RawEntry>())?;

        if !is_aligned(ev, 1usize << alignment) {
            let new_tl_ev = round_up_overflow(ev, 1usize << alignment)?.checked_sub(size_of::<RawEntry>())?;
            let dummy_data_sz = new_tl_ev.checked_sub(tl_ev)?.checked_sub(size_of::<RawEntry>())?;
            self.add(tag::EMPTY, dummy_data_sz as u32, None)?;
        }

        let te = self.add(tag_id, data_size, data);

        let header_now = unsafe { RawHeader::read(self.base) };
        if alignment > header_now.alignment {
            let mut updated = header_now;
            updated.alignment = alignment;
            unsafe { updated.write(self.base) };
            self.update_checksum();
        }

        te
    }

    /// Marks `te` empty, coalescing it with an adjacent empty entry on
    /// either side.
    pub fn remove(&mut self, te: &TransferEntry<'a>) -> bool {
        let header = unsafe { RawHeader::read(self.base) };
        if addr(te.ptr) > addr(self.base) + header.size.into_native() as usize {
            return false;
        }

        let prev = unsafe { walk::prev(self.base, header.size.into_native(), header.hdr_size, te.ptr) };
        let next = unsafe { walk::next(self.base, header.size.into_native(), header.hdr_size, Some(te.ptr)) };

        let mut target = te.ptr;

        if let Some(p) = prev {
            // SAFETY: returned by `walk::prev` over this same region.
            let mut prev_entry = unsafe { RawEntry::read(p) };
            if prev_entry.tag_id() == tag::EMPTY {
                let merged_len = match round_up_overflow(
                    unsafe { RawEntry::read(target) }.hdr_size() as usize + unsafe { RawEntry::read(target) }.data_size() as usize,
                    GRANULE,
                ) {
                    Some(v) => v,
                    None => return false,
                };
                prev_entry.set_data_size(prev_entry.data_size().wrapping_add(merged_len as u32));
                unsafe { prev_entry.write(p) };
                target = p;
            }
        }

        if let Some(n) = next {
            // SAFETY: returned by `walk::next` over this same region.
            let next_entry = unsafe { RawEntry::read(n) };
            if next_entry.tag_id() == tag::EMPTY {
                let merged_len = match round_up_overflow(next_entry.hdr_size() as usize + next_entry.data_size() as usize, GRANULE) {
                    Some(v) => v,
                    None => return false,
                };
                let mut target_entry = unsafe { RawEntry::read(target) };
                target_entry.set_data_size(target_entry.data_size().wrapping_add(merged_len as u32));
                unsafe { target_entry.write(target) };
            }
        }

        let mut target_entry = unsafe { RawEntry::read(target) };
        target_entry.set_tag_id(tag::EMPTY);
        unsafe { target_entry.write(target) };

        self.update_checksum();
        true
    }

    /// Resizes `te`'s data, growing the list (and moving whatever follows)
    /// if the new size doesn't fit in the current gap.
    pub fn set_data_size(&mut self, te: &TransferEntry<'a>, new_data_size: u32) -> bool {
        self.try_set_data_size(te.ptr, new_data_size).is_some()
    }

    fn try_set_data_size(&mut self, te_ptr: NonNull<u8>, new_data_size: u32) -> Option<()> {
        let header = unsafe { RawHeader::read(self.base) };
        let tl_old_ev = add_overflow(addr(self.base), header.size.into_native() as usize)?;

        let entry = unsafe { RawEntry::read(te_ptr) };
        let old_sz = add_overflow(entry.hdr_size() as usize, entry.data_size() as usize)?;
        let old_ev = add_with_round_up_overflow(addr(te_ptr), old_sz, GRANULE)?;

        let new_sz = add_overflow(entry.hdr_size() as usize, new_data_size as usize)?;
        let new_ev = add_with_round_up_overflow(addr(te_ptr), new_sz, GRANULE)?;

        let gap = if new_ev > old_ev {
            let dummy = unsafe { walk::next(self.base, header.size.into_native(), header.hdr_size, Some(te_ptr)) };
            let mut merge_base = old_ev;
            let mut direct_gap = None;

            if let Some(dummy_ptr) = dummy {
                let dummy_entry = unsafe { RawEntry::read(dummy_ptr) };
                if dummy_entry.tag_id() == tag::EMPTY {
                    let merge_ev = round_up_overflow(
                        old_ev
                            .checked_add(dummy_entry.hdr_size() as usize)?
                            .checked_add(dummy_entry.data_size() as usize)?,
                        GRANULE,
                    )?;
                    if merge_ev >= new_ev {
                        direct_gap = Some(merge_ev - new_ev);
                    } else {
                        merge_base = merge_ev;
                    }
                }
            }

            match direct_gap {
                Some(gap) => gap,
                None => {
                    let mov_dis = round_up_overflow(new_ev.checked_sub(merge_base)?, 1usize << header.alignment)?;
                    let new_size = (header.size.into_native() as usize).checked_add(mov_dis)?;
                    if new_size > header.max_size.into_native() as usize {
                        return None;
                    }
                    let ru_new_ev = merge_base + mov_dis;
                    let move_len = tl_old_ev - merge_base;
                    // SAFETY: both `merge_base..merge_base+move_len` and
                    // `ru_new_ev..ru_new_ev+move_len` were just checked to
                    // lie within `max_size` of the region; `copy` tolerates
                    // the overlap a forward-growing resize produces.
                    unsafe {
                        core::ptr::copy(merge_base as *const u8, ru_new_ev as *mut u8, move_len);
                    }
                    let mut new_header = header;
                    new_header.size = LittleEndian::from_native(new_size as u32);
                    unsafe { new_header.write(self.base) };
                    ru_new_ev - new_ev
                }
            }
        } else {
            old_ev - new_ev
        };

        if gap >= size_of::<RawEntry>() {
            let dummy = RawEntry::new(tag::EMPTY, size_of::<RawEntry>() as u8, (gap - size_of::<RawEntry>()) as u32);
            let dummy_ptr = ptr_at(new_ev)?;
            // SAFETY: `new_ev..new_ev+gap` lies within the region by the
            // bounds established above.
            unsafe { dummy.write(dummy_ptr) };
        }

        let mut resized = unsafe { RawEntry::read(te_ptr) };
        resized.set_data_size(new_data_size);
        unsafe { resized.write(te_ptr) };

        self.update_checksum();
        Some(())
    }

    /// Moves the list to `addr`, preserving its relative alignment offset.
    /// Compliant to §2.4.6 of the Firmware Handoff specification (v0.9).
    ///
    /// On failure — insufficient capacity at the destination — `self` is
    /// left untouched and still valid; the failure is non-destructive, as
    /// every engine operation's contract requires.
    ///
    /// # Safety
    ///
    /// `addr` must be valid for reads and writes of `max_size` bytes, and
    /// may overlap this list's own backing region (the move is performed
    /// with `memmove` semantics).
    pub unsafe fn relocate(&mut self, addr_new: NonNull<u8>, max_size: usize) -> bool {
        if max_size == 0 {
            return false;
        }

        let header = unsafe { RawHeader::read(self.base) };
        let align_mask = (1usize << header.alignment) - 1;
        let align_off = addr(self.base) & align_mask;
        let mut new_addr = (addr(addr_new) & !align_mask) + align_off;
        if new_addr < addr(addr_new) {
            new_addr += 1usize << header.alignment;
        }

        let new_max_size = match max_size.checked_sub(new_addr - addr(addr_new)) {
            Some(v) => v,
            None => return false,
        };
        if header.size.into_native() as usize > new_max_size {
            return false;
        }

        let new_base = match ptr_at(new_addr) {
            Some(v) => v,
            None => return false,
        };
        // SAFETY: caller guarantees `addr_new..addr_new+max_size` is valid
        // for read/write; `new_base..new_base+header.size` lies within it.
        unsafe {
            core::ptr::copy(self.base.as_ptr(), new_base.as_ptr(), header.size.into_native() as usize);
        }

        let mut new_header = unsafe { RawHeader::read(new_base) };
        new_header.max_size = LittleEndian::from_native(new_max_size as u32);
        unsafe { new_header.write(new_base) };

        self.base = new_base;
        self.update_checksum();
        log::info!("transfer list relocated to {:p}", new_base.as_ptr());
        true
    }
}

impl<'a> TransferEntry<'a> {
    /// The entry's tag id (24 bits).
    pub fn tag_id(&self) -> u32 {
        unsafe { RawEntry::read(self.ptr) }.tag_id()
    }

    /// The size, in bytes, of this entry's header.
    pub fn hdr_size(&self) -> u8 {
        unsafe { RawEntry::read(self.ptr) }.hdr_size()
    }

    /// The size, in bytes, of this entry's data.
    pub fn data_size(&self) -> u32 {
        unsafe { RawEntry::read(self.ptr) }.data_size()
    }

    /// The entry's data.
    pub fn data(&self) -> &'a [u8] {
        let offset = self.hdr_size() as usize;
        let len = self.data_size() as usize;
        // SAFETY: `offset..offset+len` was validated to lie within the
        // parent list's region when this entry was added or walked to.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr().add(offset), len) }
    }

    /// The entry's data, mutably.
    ///
    /// Distinct entries never overlap by construction, but the borrow
    /// checker cannot see that across two [`TransferEntry`] handles; callers
    /// holding more than one handle into the same list are responsible for
    /// not aliasing the same entry's data twice, exactly as with the
    /// original pointer-based API.
    pub fn data_mut(&mut self) -> &'a mut [u8] {
        let offset = self.hdr_size() as usize;
        let len = self.data_size() as usize;
        // SAFETY: see `data`.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr().add(offset), len) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;

    const TL_SIZE: usize = 0x1000;
    const TL_MAX_SIZE: usize = 0x10000;

    #[test]
    fn init_rejects_zero_size() {
        let mut buf = vec![0u8; TL_SIZE];
        assert!(TransferList::init(&mut buf[..0]).is_none());
    }

    #[test]
    fn init_rejects_misaligned_length() {
        let mut buf = vec![0u8; TL_SIZE];
        assert!(TransferList::init(&mut buf[..TL_SIZE - 1]).is_none());
    }

    #[test]
    fn init_succeeds_and_checks_out() {
        let mut buf = vec![0u8; TL_SIZE];
        let tl = TransferList::init(&mut buf).unwrap();
        assert_eq!(tl.check_header(), CheckResult::All);
        assert!(tl.next(None).is_none());
    }

    #[test]
    fn add_stores_data_and_keeps_checksum_zero() {
        let mut buf = vec![0u8; TL_SIZE];
        let mut tl = TransferList::init(&mut buf).unwrap();
        let payload = 0xdead_beef_u32.to_ne_bytes();

        let te = tl.add(1, payload.len() as u32, Some(&payload)).unwrap();
        assert_eq!(te.data(), &payload);
        assert!(tl.verify_checksum());

        // adding a TE larger than the remaining space fails cleanly
        assert!(tl.add(2, TL_SIZE as u32, Some(&payload)).is_none());
        assert!(tl.verify_checksum());
        assert!(tl.find(2).is_none());

        assert!(tl.add(1 << 24, 4, None).is_none());
        assert!(tl.add(1 << 25, 4, None).is_none());
    }

    #[test]
    fn add_with_align_respects_alignment_and_raises_it() {
        let mut buf = vec![0u8; TL_MAX_SIZE];
        let mut tl = TransferList::init(&mut buf).unwrap();
        let payload = [0xffu8; 0xff];

        for align in 0u8..4 {
            let te = tl.add_with_align(u32::from(align) + 1, payload.len() as u32, Some(&payload), align).unwrap();
            assert!(tl.alignment() >= align);
            assert_eq!(te.ptr.as_ptr() as usize % (1usize << align), 0);
        }
    }

    #[test]
    fn remove_coalesces_and_leaves_single_empty_entry() {
        let mut buf = vec![0u8; TL_SIZE];
        let mut tl = TransferList::init(&mut buf).unwrap();
        let data = [0xffu8; 16];
        let te0 = tl.add(1, 16, Some(&data)).unwrap();
        let te1 = tl.add(2, 16, Some(&data)).unwrap();
        let te2 = tl.add(3, 16, Some(&data)).unwrap();

        assert!(tl.remove(&te0));
        assert!(tl.verify_checksum());
        assert!(tl.find(1).is_none());

        assert!(tl.remove(&te2));
        assert!(tl.verify_checksum());
        assert!(tl.find(3).is_none());

        assert!(tl.remove(&te1));
        assert!(tl.verify_checksum());
        assert!(tl.find(2).is_none());

        let empty = tl.find(tag::EMPTY).unwrap();
        assert!(tl.next(Some(&empty)).is_none());
    }

    #[test]
    fn set_data_size_grows_in_place_then_grows_the_list() {
        let mut buf = vec![0u8; TL_SIZE];
        let mut tl = TransferList::init(&mut buf).unwrap();
        // Matches the original C suite's `setup_test_entries`: each of the
        // three entries gets an even sixth of the list's capacity, so the
        // freed middle entry is large enough to absorb the first quarter-
        // capacity growth in place.
        let entry_data_size = (TL_SIZE / 6) as u32;
        let data = vec![0xffu8; entry_data_size as usize];
        let te0 = tl.add(1, entry_data_size, Some(&data)).unwrap();
        let te1 = tl.add(2, entry_data_size, Some(&data)).unwrap();
        let _te2 = tl.add(3, entry_data_size, Some(&data)).unwrap();
        assert!(tl.remove(&te1));

        let size_before = tl.size();
        assert!(tl.set_data_size(&te0, (TL_SIZE / 4) as u32));
        assert!(tl.verify_checksum());
        assert_eq!(te0.data_size(), (TL_SIZE / 4) as u32);
        assert_eq!(tl.size(), size_before);

        let size_before = tl.size();
        assert!(tl.set_data_size(&te0, (TL_SIZE / 2) as u32));
        assert!(tl.verify_checksum());
        assert_eq!(te0.data_size(), (TL_SIZE / 2) as u32);
        assert!(tl.size() > size_before);
    }

    #[test]
    fn relocate_preserves_contents() {
        let mut buf = vec![0u8; TL_SIZE];
        let mut new_buf = vec![0u8; TL_SIZE * 2];
        let mut tl = TransferList::init(&mut buf[..TL_SIZE / 2]).unwrap();
        let payload = 0xdead_beef_u32.to_ne_bytes();
        tl.add(1, payload.len() as u32, Some(&payload)).unwrap();

        let new_base = NonNull::new(new_buf.as_mut_ptr()).unwrap();
        assert!(unsafe { tl.relocate(new_base, new_buf.len()) });
        assert_eq!(tl.check_header(), CheckResult::All);
        let te = tl.find(1).unwrap();
        assert_eq!(te.data(), &payload);
    }

    #[test]
    fn relocate_rejects_insufficient_space() {
        let mut buf = vec![0u8; TL_SIZE];
        let mut tl = TransferList::init(&mut buf).unwrap();
        let mut new_buf = vec![0u8; TL_SIZE];
        let new_base = NonNull::new(new_buf.as_mut_ptr()).unwrap();
        assert!(!unsafe { tl.relocate(new_base, 0) });
        assert_eq!(tl.check_header(), CheckResult::All);
    }
}
