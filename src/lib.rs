//! Utility layers pulled out of a larger engine workspace.
//!
//! [`alloc`] is the one subsystem this crate actually implements in full: a
//! constant-time offset suballocator. Everything else here ([`collections`],
//! [`os`], [`build`], [`gpu`], [`ui`]) is the thin, intentionally incomplete
//! glue that the allocator was originally consumed through — kept as a
//! sketch so the allocator's place in a real engine is legible, not as a
//! product surface in its own right.

pub mod alloc;

pub mod build;
pub mod collections;
pub mod gpu;
pub mod os;
pub mod ui;

pub use alloc::{Allocation, Allocator, AllocatorConfig, AllocatorError, NodeIndex, StorageReport};

/// Initializes the crate's logger. Idempotent — safe to call from multiple
/// entry points (library consumers and the demo binary both call it).
pub fn init_logging() {
    let _ = env_logger::try_init();
}
