//! Human-readable dumps of a transfer list and its entries, for
//! diagnostics. Grounded on `transfer_list.c`'s `transfer_list_dump` /
//! `transfer_entry_dump`, reworked onto the `log` facade instead of
//! `printf` so a caller's chosen sink (or nothing, if none is registered)
//! decides where the output goes.

use crate::header::RawHeader;
use crate::list::{TransferEntry, TransferList};

impl TransferList<'_> {
    /// Logs the header fields and every entry, at `info` level.
    pub fn dump(&self) {
        // SAFETY: invariant of every constructor.
        let header = unsafe { RawHeader::read(self.base) };

        log::info!("dump transfer list:");
        log::info!("signature  0x{:x}", header.signature.into_native());
        log::info!("checksum   0x{:x}", header.checksum);
        log::info!("version    0x{:x}", header.version);
        log::info!("hdr_size   0x{:x}", header.hdr_size);
        log::info!("alignment  0x{:x}", self.alignment());
        log::info!("size       0x{:x}", self.size());
        log::info!("max_size   0x{:x}", self.max_size());
        log::info!("flags      0x{:x}", self.flags().bits());

        let mut i = 0;
        let mut cur = self.next(None);
        while let Some(te) = cur {
            log::info!("entry {i}:");
            te.dump();
            i += 1;
            cur = self.next(Some(&te));
        }
    }
}

impl TransferEntry<'_> {
    /// Logs the entry's header fields and data address, at `info` level.
    pub fn dump(&self) {
        log::info!("tag_id     0x{:x}", self.tag_id());
        log::info!("hdr_size   0x{:x}", self.hdr_size());
        log::info!("data_size  0x{:x}", self.data_size());
        log::info!("data_addr  {:p}", self.data().as_ptr());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::tag;
    use std::vec;

    #[test]
    fn dump_does_not_panic_on_empty_or_populated_list() {
        let mut buf = vec![0u8; 0x1000];
        let mut tl = TransferList::init(&mut buf).unwrap();
        tl.dump();
        tl.add(tag::FDT, 4, Some(&[1, 2, 3, 4])).unwrap();
        tl.dump();
    }
}
