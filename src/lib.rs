//! # Transfer List
//!
//! This library manages a **Transfer List (TL)**: a self-describing,
//! in-memory container placed in a reserved, fixed region of physical
//! memory and used to hand off structured payloads ("Transfer Entries",
//! TEs) between successive firmware stages during system boot. It is
//! compliant with the Firmware Handoff specification v0.9, §2.4.
//!
//! The engine does not interpret any tag's payload (beyond recognizing the
//! empty sentinel), does not allocate memory, does not perform I/O, and is
//! neither thread-safe nor re-entrant over the same list: the caller owns
//! the backing region and serializes access to it.

#![allow(clippy::identity_op)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::redundant_field_names)]

#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod arith;
mod checksum;
pub mod dump;
pub mod entry;
pub mod error;
pub mod event_log;
pub mod ffi;
pub mod header;
pub mod list;
pub mod logger;
pub mod lookup;
mod walk;

pub use entry::tag;
pub use error::InitError;
pub use header::{CheckResult, Flags, GRANULE, INIT_MAX_ALIGN, SIGNATURE, VERSION};
pub use list::{TransferEntry, TransferList};
pub use logger::register_logger;
pub use lookup::{AapcsParams, EntryPointInfo, ParamHeader, REGISTER_CONVENTION_VERSION};

#[cfg(feature = "std")]
pub use logger::init_default_logger;
