/// Fixed-capacity texture slot pool.
///
/// An arena of `capacity` slots, each with a generation counter (`version`).
/// The slot index plus its version yield the texture name bound into the
/// shared runtime dictionary, so a reused slot never hands the graphics
/// layer a name it may still have cached for an older surface.
///
/// # Example
///
/// ```ignore
/// let mut pool = SlotPool::new(2, "dui_pool");
/// let a = pool.acquire(&mut backend)?;   // slot 0, v1
/// let b = pool.acquire(&mut backend)?;   // slot 1, v1
/// pool.release(a);
/// let c = pool.acquire(&mut backend)?;   // slot 0, v2
///
/// for event in pool.take_events() {
///     event.emit();
/// }
/// ```
///
/// The pool never calls a logger itself. It queues `PoolEvent`s, and the
/// owner emits them once it no longer holds any lock around the pool.

use std::fmt;
use crate::backend::{DictionaryHandle, SurfaceBackend, TextureHandle};
use crate::error::{Error, Result};

/// Index of a slot in the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(usize);

impl SlotId {
    /// Wrap a raw slot index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw slot index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build the texture name for a slot at a given version
///
/// Deterministic: equal inputs give equal names, and distinct
/// (slot, version) pairs never collide.
pub fn slot_texture_name(prefix: &str, slot: SlotId, version: u64) -> String {
    format!("{}_{}_v{}", prefix, slot.index(), version)
}

/// Something worth logging that happened inside the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEvent {
    /// Dictionary created and slots allocated
    Initialized { dictionary_name: String, capacity: usize },
    /// Acquisition refused, every slot held
    Exhausted { capacity: usize },
    /// Slot handed out at a new version
    Acquired { slot: SlotId, version: u64 },
    /// Slot returned to the pool
    Released { slot: SlotId },
    /// Release of a free slot, ignored
    AlreadyFree { slot: SlotId },
    /// Release of a slot past the capacity (or before initialization), ignored
    OutOfRange { slot: SlotId },
}

impl PoolEvent {
    /// Send the event to the process-wide logger
    pub fn emit(&self) {
        match self {
            PoolEvent::Initialized { dictionary_name, capacity } => {
                crate::dui_info!("dui::SlotPool",
                    "Pool '{}' initialized with {} slots", dictionary_name, capacity);
            }
            PoolEvent::Exhausted { capacity } => {
                crate::dui_warn!("dui::SlotPool",
                    "No available texture slots in pool (max {})", capacity);
            }
            PoolEvent::Acquired { slot, version } => {
                crate::dui_debug!("dui::SlotPool", "Acquired slot {} (v{})", slot, version);
            }
            PoolEvent::Released { slot } => {
                crate::dui_debug!("dui::SlotPool", "Released slot {}", slot);
            }
            PoolEvent::AlreadyFree { slot } => {
                crate::dui_trace!("dui::SlotPool", "Slot {} already free, release ignored", slot);
            }
            PoolEvent::OutOfRange { slot } => {
                crate::dui_trace!("dui::SlotPool", "Slot {} out of range, release ignored", slot);
            }
        }
    }
}

/// One unit of the pool
#[derive(Debug, Clone, Default)]
pub struct Slot {
    used: bool,
    backing_texture: Option<TextureHandle>,
    version: u64,
}

impl Slot {
    /// Whether a surface currently holds this slot
    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Texture bound for the current holder, if any
    pub fn backing_texture(&self) -> Option<TextureHandle> {
        self.backing_texture
    }

    /// Number of times this slot has been acquired
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Bounded slot allocator with per-slot versions
pub struct SlotPool {
    capacity: usize,
    dictionary_name: String,
    /// Created on first acquisition
    dictionary: Option<DictionaryHandle>,
    /// Empty until first acquisition, then exactly `capacity` long
    slots: Vec<Slot>,
    /// Queued until the owner calls `take_events()`
    events: Vec<PoolEvent>,
}

impl SlotPool {
    /// Create an uninitialized pool
    ///
    /// Nothing is allocated until the first `acquire()`.
    pub fn new(capacity: usize, dictionary_name: &str) -> Self {
        Self {
            capacity,
            dictionary_name: dictionary_name.to_string(),
            dictionary: None,
            slots: Vec::new(),
            events: Vec::new(),
        }
    }

    fn initialize(&mut self, backend: &mut dyn SurfaceBackend) -> Result<()> {
        if self.dictionary.is_some() {
            return Ok(());
        }

        let dictionary = backend.create_texture_dictionary(&self.dictionary_name)?;
        self.dictionary = Some(dictionary);
        self.slots = vec![Slot::default(); self.capacity];

        self.events.push(PoolEvent::Initialized {
            dictionary_name: self.dictionary_name.clone(),
            capacity: self.capacity,
        });
        Ok(())
    }

    /// Acquire the lowest free slot
    ///
    /// Initializes the pool on first call (creates the texture dictionary
    /// through `backend`). Marks the slot used and bumps its version.
    ///
    /// # Errors
    ///
    /// - `PoolExhausted` if every slot is in use
    /// - any error from dictionary creation, unchanged
    pub fn acquire(&mut self, backend: &mut dyn SurfaceBackend) -> Result<SlotId> {
        self.initialize(backend)?;

        let Some(index) = self.slots.iter().position(|slot| !slot.used) else {
            self.events.push(PoolEvent::Exhausted { capacity: self.capacity });
            return Err(Error::PoolExhausted { capacity: self.capacity });
        };

        let slot = &mut self.slots[index];
        slot.used = true;
        slot.version += 1;

        let version = slot.version;
        self.events.push(PoolEvent::Acquired { slot: SlotId(index), version });
        Ok(SlotId(index))
    }

    /// Return a slot to the pool
    ///
    /// Out-of-range or already free slots are ignored, so duplicate
    /// teardown paths cannot corrupt the pool. The version is kept.
    pub fn release(&mut self, slot: SlotId) {
        let event = match self.slots.get_mut(slot.index()) {
            Some(entry) if entry.used => {
                entry.used = false;
                entry.backing_texture = None;
                PoolEvent::Released { slot }
            }
            Some(_) => PoolEvent::AlreadyFree { slot },
            None => PoolEvent::OutOfRange { slot },
        };
        self.events.push(event);
    }

    /// Drain the events queued since the last call, oldest first
    pub fn take_events(&mut self) -> Vec<PoolEvent> {
        std::mem::take(&mut self.events)
    }

    fn slot(&self, slot: SlotId) -> Result<&Slot> {
        self.slots.get(slot.index()).ok_or_else(|| Error::InvalidSlotReference(
            format!("slot {} out of range (capacity {}, initialized: {})",
                slot, self.capacity, self.is_initialized())
        ))
    }

    /// Current version of a slot
    ///
    /// # Errors
    ///
    /// Returns `InvalidSlotReference` if the slot does not exist.
    pub fn version(&self, slot: SlotId) -> Result<u64> {
        Ok(self.slot(slot)?.version)
    }

    /// Texture name for a slot at its current version
    pub fn texture_name(&self, prefix: &str, slot: SlotId) -> Result<String> {
        Ok(slot_texture_name(prefix, slot, self.version(slot)?))
    }

    /// Record the texture bound for the current holder of a slot
    ///
    /// # Errors
    ///
    /// Returns `InvalidSlotReference` if the slot does not exist or is free.
    pub fn assign_texture(&mut self, slot: SlotId, texture: TextureHandle) -> Result<()> {
        match self.slots.get_mut(slot.index()) {
            Some(entry) if entry.used => {
                entry.backing_texture = Some(texture);
                Ok(())
            }
            _ => Err(Error::InvalidSlotReference(
                format!("cannot assign a texture to free or missing slot {}", slot)
            )),
        }
    }

    /// Texture bound to a slot, if the slot is held and bound
    pub fn texture(&self, slot: SlotId) -> Option<TextureHandle> {
        self.slots.get(slot.index()).and_then(|entry| entry.backing_texture)
    }

    /// Whether a slot is currently held
    pub fn is_used(&self, slot: SlotId) -> bool {
        self.slots.get(slot.index()).is_some_and(|entry| entry.used)
    }

    /// Number of held slots
    pub fn used_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.used).count()
    }

    /// Fixed capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the first acquisition has happened
    pub fn is_initialized(&self) -> bool {
        self.dictionary.is_some()
    }

    /// Shared dictionary handle (None before initialization)
    pub fn dictionary(&self) -> Option<DictionaryHandle> {
        self.dictionary
    }

    /// Shared dictionary name
    pub fn dictionary_name(&self) -> &str {
        &self.dictionary_name
    }

    /// All slots in index order (empty before initialization)
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "slot_pool_tests.rs"]
mod tests;
