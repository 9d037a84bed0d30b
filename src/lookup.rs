//! Looking up entries by tag, and building the architecture-specific
//! handoff arguments boot stages pass to each other in registers. Grounded
//! on `transfer_list.c`'s `transfer_list_find` / `transfer_list_entry_data`
//! and `ep_info.c`'s `transfer_list_set_handoff_args`.

use crate::entry::tag;
use crate::header::CheckResult;
use crate::list::{TransferEntry, TransferList};

/// Version of the register convention used to hand off a transfer list
/// through the AAPCS argument registers, per Firmware Handoff spec v0.9.
pub const REGISTER_CONVENTION_VERSION: u64 = 1;

const REGISTER_CONVENTION_VERSION_SHIFT_64: u32 = 32;
const REGISTER_CONVENTION_VERSION_SHIFT_32: u32 = 24;
const REGISTER_CONVENTION_VERSION_MASK: u64 = 0xff;

/// The AArch64 `x1` handoff value: the transfer list signature in the low
/// 32 bits, the register convention version in bits 32..40.
pub fn handoff_x1_value(version: u64, signature: u32) -> u64 {
    (u64::from(signature) & ((1u64 << REGISTER_CONVENTION_VERSION_SHIFT_64) - 1))
        | ((version & REGISTER_CONVENTION_VERSION_MASK) << REGISTER_CONVENTION_VERSION_SHIFT_64)
}

/// The AArch32 `r1` handoff value: the transfer list signature in the low
/// 24 bits, the register convention version in bits 24..32.
pub fn handoff_r1_value(version: u64, signature: u32) -> u64 {
    (u64::from(signature) & ((1u64 << REGISTER_CONVENTION_VERSION_SHIFT_32) - 1))
        | ((version & REGISTER_CONVENTION_VERSION_MASK) << REGISTER_CONVENTION_VERSION_SHIFT_32)
}

/// Extracts the `RW` bit (bit 4) of a saved program status register value,
/// which is 0 for an AArch64 exception level and 1 for AArch32.
pub const fn get_spsr_rw(spsr: u64) -> u64 {
    (spsr >> 0x4) & 0x1
}

/// Mirrors `struct param_header`: the common header every handoff parameter
/// block this crate knows about starts with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParamHeader {
    pub kind: u8,
    pub version: u8,
    pub size: u16,
    pub attr: u32,
}

/// Mirrors `struct aapcs_params`: the eight general-purpose argument
/// registers passed to the next boot stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AapcsParams {
    pub arg0: u64,
    pub arg1: u64,
    pub arg2: u64,
    pub arg3: u64,
    pub arg4: u64,
    pub arg5: u64,
    pub arg6: u64,
    pub arg7: u64,
}

/// Mirrors `struct entry_point_info`: the saved state of a boot stage's
/// entry point, including the registers it will receive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntryPointInfo {
    pub h: ParamHeader,
    pub pc: u64,
    pub spsr: u64,
    pub args: AapcsParams,
}

impl<'a> TransferList<'a> {
    /// Searches for an entry with the given tag id. Compliant to §2.4.2 of
    /// the Firmware Handoff specification (v0.9).
    ///
    /// Searching for [`tag::EMPTY`] returns the first coalesced free entry,
    /// if any — this falls out of the same comparison used for every other
    /// tag and is not treated as a special case.
    pub fn find(&self, tag_id: u32) -> Option<TransferEntry<'a>> {
        let mut cur = None;
        loop {
            cur = self.next(cur.as_ref());
            match &cur {
                Some(te) if te.tag_id() == tag_id => return cur,
                Some(_) => continue,
                None => return None,
            }
        }
    }

    /// Populates `ep_info`'s argument registers with the handoff convention
    /// described in §2.1 of the Firmware Handoff specification (v0.9): the
    /// flattened device tree address and the transfer list's signature and
    /// register convention version, placed according to the target's
    /// exception level width.
    ///
    /// Returns `false` (leaving `ep_info` untouched) if this list's header
    /// isn't valid for any operation.
    pub fn set_handoff_args(&self, ep_info: &mut EntryPointInfo, signature: u32, is_64bit: bool) -> bool {
        if self.check_header() == CheckResult::Invalid {
            return false;
        }

        let dt = self.find(tag::FDT).map(|te| te.data().as_ptr() as u64).unwrap_or(0);

        if is_64bit && get_spsr_rw(ep_info.spsr) == 0 {
            ep_info.args.arg0 = dt;
            ep_info.args.arg1 = handoff_x1_value(REGISTER_CONVENTION_VERSION, signature);
            ep_info.args.arg2 = 0;
        } else {
            ep_info.args.arg0 = 0;
            ep_info.args.arg1 = handoff_r1_value(REGISTER_CONVENTION_VERSION, signature);
            ep_info.args.arg2 = dt;
        }

        ep_info.args.arg3 = self.base.as_ptr() as u64;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;

    #[test]
    fn find_returns_none_on_empty_list() {
        let mut buf = vec![0u8; 0x1000];
        let tl = TransferList::init(&mut buf).unwrap();
        assert!(tl.find(tag::FDT).is_none());
    }

    #[test]
    fn find_locates_matching_tag() {
        let mut buf = vec![0u8; 0x1000];
        let mut tl = TransferList::init(&mut buf).unwrap();
        tl.add(tag::FDT, 4, Some(&[1, 2, 3, 4])).unwrap();
        let te = tl.find(tag::FDT).unwrap();
        assert_eq!(te.data(), &[1, 2, 3, 4]);
    }

    #[test]
    fn set_handoff_args_aarch64_el2_uses_x1() {
        let mut buf = vec![0u8; 0x1000];
        let mut tl = TransferList::init(&mut buf).unwrap();
        tl.add(tag::FDT, 4, Some(&[0xaa; 4])).unwrap();
        let dt_addr = tl.find(tag::FDT).unwrap().data().as_ptr() as u64;

        let mut ep_info = EntryPointInfo {
            spsr: 0x3c9, // RW bit clear: AArch64
            ..Default::default()
        };
        assert!(tl.set_handoff_args(&mut ep_info, crate::header::SIGNATURE, true));
        assert_eq!(ep_info.args.arg0, dt_addr);
        assert_eq!(ep_info.args.arg1, handoff_x1_value(REGISTER_CONVENTION_VERSION, crate::header::SIGNATURE));
        assert_eq!(ep_info.args.arg2, 0);
    }

    #[test]
    fn set_handoff_args_aarch32_uses_r1() {
        let mut buf = vec![0u8; 0x1000];
        let mut tl = TransferList::init(&mut buf).unwrap();
        tl.add(tag::FDT, 4, Some(&[0xaa; 4])).unwrap();
        let dt_addr = tl.find(tag::FDT).unwrap().data().as_ptr() as u64;

        let mut ep_info = EntryPointInfo::default();
        assert!(tl.set_handoff_args(&mut ep_info, crate::header::SIGNATURE, false));
        assert_eq!(ep_info.args.arg0, 0);
        assert_eq!(ep_info.args.arg1, handoff_r1_value(REGISTER_CONVENTION_VERSION, crate::header::SIGNATURE));
        assert_eq!(ep_info.args.arg2, dt_addr);
    }

    #[test]
    fn set_handoff_args_rejects_invalid_header() {
        let mut buf = vec![0u8; 0x1000];
        let tl = TransferList::init(&mut buf).unwrap();
        // Flip the signature's first byte directly; `buf` stays borrowed by `tl`.
        unsafe { *tl.base.as_ptr() ^= 0xff };
        let mut ep_info = EntryPointInfo::default();
        assert!(!tl.set_handoff_args(&mut ep_info, crate::header::SIGNATURE, true));
    }
}
