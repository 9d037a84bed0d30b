//! Low-level primitives for reading and writing the transfer list's packed,
//! little-endian, potentially-unaligned wire format.

pub mod endian;
pub mod packed;

pub use endian::{LittleEndian, NativeEndian};
pub use packed::Packed;
