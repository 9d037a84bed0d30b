//! TPM event log support: extending and finalizing a `TL_TAG_TPM_EVLOG`
//! entry in place. Grounded on `tpm_event_log.c`'s
//! `transfer_list_event_log_extend` / `transfer_list_event_log_finish`.

use crate::entry::tag;
use crate::list::TransferList;

/// Bytes reserved at the start of the event log entry's data for the
/// logging client's own bookkeeping, before the actual log content begins.
pub const EVENT_LOG_RESERVED_BYTES: usize = 4;

impl<'a> TransferList<'a> {
    /// Grows the TPM event log entry to make room for `req_size` more bytes,
    /// returning the newly available window to write into.
    ///
    /// Resizes the existing entry in place if possible; otherwise adds a
    /// new, larger entry and copies the old log into it.
    pub fn event_log_extend(&mut self, req_size: usize) -> Option<&'a mut [u8]> {
        if req_size == 0 {
            log::error!("invalid arguments to event log extend");
            return None;
        }

        let existing = self.find(tag::TPM_EVLOG);
        let existing_offset = existing.map(|e| e.data_size() as usize).unwrap_or(EVENT_LOG_RESERVED_BYTES);

        if let Some(existing_entry) = existing {
            if self.set_data_size(&existing_entry, (req_size + existing_offset) as u32) {
                log::info!("TPM event log entry resized: new space {} bytes at offset {}", req_size, existing_offset);
                let data = existing_entry.data();
                // SAFETY: `set_data_size` just grew this entry's data region
                // to at least `existing_offset + req_size` bytes.
                return Some(unsafe { core::slice::from_raw_parts_mut(data.as_ptr().add(existing_offset) as *mut u8, req_size) });
            }
        }

        let new_entry = self.add(tag::TPM_EVLOG, (req_size + existing_offset) as u32, None);
        let new_entry = match new_entry {
            Some(e) => e,
            None => {
                log::error!("failed to add TPM event log entry to transfer list");
                return None;
            }
        };

        if let Some(existing_entry) = existing {
            log::info!("copying existing event log ({existing_offset} bytes) to new entry");
            let src = existing_entry.data();
            let dst = new_entry.data();
            // SAFETY: `src` is the old entry's `existing_offset`-byte data
            // region; `dst` was just sized to hold at least that many bytes.
            unsafe {
                core::ptr::copy(src.as_ptr(), dst.as_ptr() as *mut u8, existing_offset);
            }
            self.remove(&existing_entry);
        }

        let data = new_entry.data();
        // SAFETY: `new_entry`'s data region holds `existing_offset + req_size` bytes.
        Some(unsafe { core::slice::from_raw_parts_mut(data.as_ptr().add(existing_offset) as *mut u8, req_size) })
    }

    /// Trims the TPM event log entry to the amount of data actually
    /// written, given the end offset `cursor` a caller reached while
    /// filling the window returned by [`event_log_extend`](Self::event_log_extend).
    ///
    /// Returns the finished log, past the reserved bookkeeping bytes.
    pub fn event_log_finish(&mut self, cursor: usize) -> Option<&'a mut [u8]> {
        let entry = self.find(tag::TPM_EVLOG)?;
        let entry_data_base = entry.data().as_ptr() as usize;
        let data_size = entry.data_size() as usize;

        if cursor < entry_data_base || cursor >= entry_data_base + data_size {
            log::error!("invalid cursor: outside event log bounds");
            return None;
        }

        let final_log_size = cursor - entry_data_base;
        if final_log_size < EVENT_LOG_RESERVED_BYTES {
            log::error!("invalid cursor: inside reserved event log bytes");
            return None;
        }

        if !self.set_data_size(&entry, final_log_size as u32) {
            log::error!("unable to resize event log TE");
            return None;
        }
        self.update_checksum();

        let log_size = final_log_size - EVENT_LOG_RESERVED_BYTES;
        log::info!("TPM event log finalized: trimmed to {log_size} bytes");

        // SAFETY: `entry_data_base + EVENT_LOG_RESERVED_BYTES ..
        // entry_data_base + final_log_size` lies within the just-resized entry.
        let base_ptr = unsafe { (entry_data_base as *mut u8).add(EVENT_LOG_RESERVED_BYTES) };
        Some(unsafe { core::slice::from_raw_parts_mut(base_ptr, log_size) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;

    #[test]
    fn extend_then_finish_round_trips_log_contents() {
        let mut buf = vec![0u8; 0x1000];
        let mut tl = TransferList::init(&mut buf).unwrap();

        let window = tl.event_log_extend(16).unwrap();
        window[..4].copy_from_slice(&[1, 2, 3, 4]);
        let cursor = window.as_ptr() as usize + 4;

        let log = tl.event_log_finish(cursor).unwrap();
        assert_eq!(log, &[1, 2, 3, 4]);
    }

    #[test]
    fn extend_grows_an_existing_log() {
        let mut buf = vec![0u8; 0x1000];
        let mut tl = TransferList::init(&mut buf).unwrap();

        let first = tl.event_log_extend(8).unwrap();
        first.copy_from_slice(&[0xaa; 8]);
        let entry = tl.find(tag::TPM_EVLOG).unwrap();
        assert_eq!(entry.data_size() as usize, EVENT_LOG_RESERVED_BYTES + 8);

        let second = tl.event_log_extend(8).unwrap();
        assert_eq!(second.len(), 8);
        let entry = tl.find(tag::TPM_EVLOG).unwrap();
        assert_eq!(entry.data()[EVENT_LOG_RESERVED_BYTES..EVENT_LOG_RESERVED_BYTES + 8], [0xaa; 8]);
    }

    #[test]
    fn extend_rejects_zero_size() {
        let mut buf = vec![0u8; 0x1000];
        let mut tl = TransferList::init(&mut buf).unwrap();
        assert!(tl.event_log_extend(0).is_none());
    }

    #[test]
    fn finish_rejects_cursor_outside_bounds() {
        let mut buf = vec![0u8; 0x1000];
        let mut tl = TransferList::init(&mut buf).unwrap();
        let window = tl.event_log_extend(8).unwrap();
        let base = window.as_ptr() as usize;
        assert!(tl.event_log_finish(base - 1).is_none());
        assert!(tl.event_log_finish(base + 100).is_none());
    }
}
