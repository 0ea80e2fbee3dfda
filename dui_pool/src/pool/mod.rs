//! Slot pool module
//!
//! Bounded allocation of texture slots with per-slot versions.

mod slot_pool;

pub use slot_pool::{PoolEvent, Slot, SlotId, SlotPool, slot_texture_name};
