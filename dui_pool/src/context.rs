/// Pool context - the per-process owner of the slot pool and live registry
///
/// A `PoolContext` holds the native backend, the `SlotPool` and the registry
/// of live surfaces behind a single Mutex. It is shared through `Arc` with
/// every `Dui` it creates. The pool initializes lazily on the first surface;
/// there is no shutdown besides the session-end sweep.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use crate::backend::{AddressableHandle, DictionaryHandle, SurfaceBackend, SurfaceHandle, TextureHandle};
use crate::config::PoolConfig;
use crate::error::{Error, Result};
use crate::log::{self, Logger};
use crate::pool::{PoolEvent, SlotId, SlotPool, slot_texture_name};
use crate::registry::{DuiRecord, Registry};
use crate::surface::{Dui, DuiDesc, debug_log};

/// Mutable state guarded by the context lock
pub(crate) struct PoolState {
    backend: Box<dyn SurfaceBackend>,
    pool: SlotPool,
    registry: Registry,
    next_id: u64,
    /// Log output produced under the lock, emitted by `PoolContext::unlock`
    deferred: Vec<Deferred>,
}

impl PoolState {
    /// Queue a log entry behind the pool events already pending
    fn defer(&mut self, entry: Deferred) {
        self.collect_pool_events();
        self.deferred.push(entry);
    }

    fn collect_pool_events(&mut self) {
        let events = self.pool.take_events();
        self.deferred.extend(events.into_iter().map(Deferred::Pool));
    }
}

/// A log entry held back until the context lock is released
///
/// No logger runs while the lock is held, so loggers may query the context.
enum Deferred {
    Pool(PoolEvent),
    Warn(String),
    /// Per-surface debug entry for a debug `Dui`
    Surface(Arc<dyn Logger>, String),
}

impl Deferred {
    fn emit(self) {
        match self {
            Deferred::Pool(event) => event.emit(),
            Deferred::Warn(message) => crate::dui_warn!("dui::PoolContext", "{}", message),
            Deferred::Surface(logger, message) => debug_log(Some(&logger), || message),
        }
    }
}

/// Everything a new surface needs, produced under the context lock
pub(crate) struct CreatedSurface {
    pub id: String,
    pub slot: SlotId,
    pub version: u64,
    pub surface: SurfaceHandle,
    pub dui_handle: AddressableHandle,
    pub texture: TextureHandle,
    pub texture_name: String,
    pub logger: Option<Arc<dyn Logger>>,
}

/// Owner of the slot pool and the live surface registry
///
/// # Example
///
/// ```ignore
/// let context = PoolContext::new(PoolConfig::default(), HostBackend::new())?;
/// let dui = context.create_dui(DuiDesc::new("https://example.org", 1280, 720))?;
/// // ... draw with dui.dictionary_name() / dui.texture_name()
/// dui.remove();
/// ```
pub struct PoolContext {
    config: PoolConfig,
    logger: Arc<dyn Logger>,
    /// Origin of the millisecond timer embedded in surface ids
    created_at: Instant,
    state: Mutex<PoolState>,
}

impl PoolContext {
    /// Create a context using the process-wide logger for debug surfaces
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if the config is invalid.
    pub fn new<B: SurfaceBackend + 'static>(config: PoolConfig, backend: B) -> Result<Arc<Self>> {
        Self::with_logger(config, backend, log::current_logger())
    }

    /// Create a context whose debug surfaces log through `logger`
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if the config is invalid.
    pub fn with_logger<B: SurfaceBackend + 'static>(
        config: PoolConfig,
        backend: B,
        logger: Arc<dyn Logger>,
    ) -> Result<Arc<Self>> {
        config.validate().map_err(|err| {
            crate::dui_error!("dui::PoolContext", "Invalid pool config: {}", err);
            err
        })?;

        let pool = SlotPool::new(config.capacity, &config.dictionary_name);
        Ok(Arc::new(Self {
            config,
            logger,
            created_at: Instant::now(),
            state: Mutex::new(PoolState {
                backend: Box::new(backend),
                pool,
                registry: Registry::new(),
                next_id: 0,
                deferred: Vec::new(),
            }),
        }))
    }

    /// Lock for creation and mutators
    ///
    /// A poisoned lock is reported as `InitializationFailed`.
    fn lock(&self) -> Result<MutexGuard<'_, PoolState>> {
        self.state.lock().map_err(|poisoned| {
            drop(poisoned);
            crate::dui_error!("dui::PoolContext", "PoolContext lock poisoned");
            Error::InitializationFailed("PoolContext lock poisoned".to_string())
        })
    }

    /// Lock for queries and teardown; a poisoned lock still yields the state
    fn lock_or_recover(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Release the lock, then emit everything logged while it was held
    fn unlock(mut guard: MutexGuard<'_, PoolState>) {
        guard.collect_pool_events();
        let deferred = std::mem::take(&mut guard.deferred);
        drop(guard);

        for entry in deferred {
            entry.emit();
        }
    }

    /// Create a surface bound to a slot of this pool
    ///
    /// Shorthand for `Dui::new(&context, desc)`.
    pub fn create_dui(self: &Arc<Self>, desc: DuiDesc) -> Result<Dui> {
        Dui::new(self, desc)
    }

    /// Acquire a slot, create and bind the native surface, register it
    ///
    /// On any failure after the slot was taken, the slot is released again
    /// and nothing is registered.
    pub(crate) fn create_surface(&self, desc: &DuiDesc) -> Result<CreatedSurface> {
        let mut guard = self.lock()?;
        let created = self.create_locked(&mut guard, desc);
        Self::unlock(guard);
        created
    }

    fn create_locked(&self, state: &mut PoolState, desc: &DuiDesc) -> Result<CreatedSurface> {
        let slot = state.pool.acquire(state.backend.as_mut())?;

        let bound = state.pool.version(slot).and_then(|version| {
            let texture_name = slot_texture_name(&self.config.texture_prefix, slot, version);
            let (surface, dui_handle, texture) = Self::bind_native(state, desc, &texture_name)?;
            state.pool.assign_texture(slot, texture)?;
            Ok((version, texture_name, surface, dui_handle, texture))
        });

        let (version, texture_name, surface, dui_handle, texture) = match bound {
            Ok(bound) => bound,
            Err(err) => {
                state.pool.release(slot);
                return Err(err);
            }
        };

        let id = format!(
            "{}_{}_{}",
            self.config.resource_name,
            self.created_at.elapsed().as_millis(),
            state.next_id
        );
        state.next_id += 1;

        let logger = desc.debug.then(|| self.logger.clone());
        state.registry.insert(id.clone(), DuiRecord {
            slot,
            surface,
            logger: logger.clone(),
        });

        Ok(CreatedSurface {
            id,
            slot,
            version,
            surface,
            dui_handle,
            texture,
            texture_name,
            logger,
        })
    }

    fn bind_native(
        state: &mut PoolState,
        desc: &DuiDesc,
        texture_name: &str,
    ) -> Result<(SurfaceHandle, AddressableHandle, TextureHandle)> {
        let dictionary = state.pool.dictionary().ok_or_else(|| {
            Error::InitializationFailed("Texture dictionary missing after acquire".to_string())
        })?;

        let surface = state.backend.create_surface(&desc.url, desc.width, desc.height)?;

        let bound = state.backend.addressable_handle(surface).and_then(|dui_handle| {
            let texture = state.backend.bind_texture(dictionary, texture_name, &dui_handle)?;
            Ok((dui_handle, texture))
        });

        match bound {
            Ok((dui_handle, texture)) => Ok((surface, dui_handle, texture)),
            Err(err) => {
                if let Err(destroy_err) = state.backend.destroy_surface(surface) {
                    state.defer(Deferred::Warn(format!(
                        "Failed to destroy unbound surface {:?}: {}", surface, destroy_err)));
                }
                Err(err)
            }
        }
    }

    /// Run the teardown sequence for one registered surface
    ///
    /// Blank, destroy, release the slot, unregister. Returns false if `id`
    /// is not registered (already torn down), in which case nothing happens.
    fn teardown(&self, state: &mut PoolState, id: &str) -> bool {
        let Some(record) = state.registry.remove(id) else {
            return false;
        };

        if let Err(err) = state.backend.set_surface_url(record.surface, &self.config.blank_url) {
            state.defer(Deferred::Warn(format!("Failed to blank dui {}: {}", id, err)));
        }
        if let Err(err) = state.backend.destroy_surface(record.surface) {
            state.defer(Deferred::Warn(format!("Failed to destroy dui {}: {}", id, err)));
        }
        state.pool.release(record.slot);

        if let Some(logger) = record.logger {
            state.defer(Deferred::Surface(logger,
                format!("Dui {} removed (slot {} released)", id, record.slot)));
        }
        true
    }

    /// Tear down one surface by id (used by `Dui::remove` and `Drop`)
    ///
    /// Runs on a poisoned lock too, so the slot and native surface are
    /// still returned.
    pub(crate) fn remove_surface(&self, id: &str) -> bool {
        let mut guard = self.lock_or_recover();
        let removed = self.teardown(&mut guard, id);
        Self::unlock(guard);
        removed
    }

    /// Native surface of a live entry
    pub(crate) fn with_live_surface<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut dyn SurfaceBackend, SurfaceHandle) -> Result<T>,
    ) -> Result<T> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let surface = state.registry.get(id)
            .map(|record| record.surface)
            .ok_or_else(|| Error::InvalidResource(format!("Dui {} has been removed", id)))?;
        f(state.backend.as_mut(), surface)
    }

    /// Session-end signal
    ///
    /// If `session` is this context's `resource_name`, every live surface is
    /// removed in creation order. Returns the number of surfaces removed.
    pub fn on_session_end(&self, session: &str) -> usize {
        if session != self.config.resource_name {
            return 0;
        }

        let removed = self.remove_all();
        if removed > 0 {
            crate::dui_info!("dui::PoolContext",
                "Session '{}' ended, removed {} dui(s)", session, removed);
        }
        removed
    }

    /// Remove every live surface in creation order
    pub fn remove_all(&self) -> usize {
        let mut guard = self.lock_or_recover();
        let state = &mut *guard;

        let ids = state.registry.ids().to_vec();
        let removed = ids.iter().filter(|id| self.teardown(state, id)).count();
        Self::unlock(guard);
        removed
    }

    // ===== QUERIES =====

    /// Pool configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Fixed pool capacity
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Name of the shared texture dictionary
    pub fn dictionary_name(&self) -> &str {
        &self.config.dictionary_name
    }

    /// Shared texture dictionary (None until the first surface is created)
    pub fn dictionary(&self) -> Option<DictionaryHandle> {
        self.lock_or_recover().pool.dictionary()
    }

    /// Number of live surfaces
    pub fn live_count(&self) -> usize {
        self.lock_or_recover().registry.len()
    }

    /// Ids of live surfaces, in creation order
    pub fn live_ids(&self) -> Vec<String> {
        self.lock_or_recover().registry.ids().to_vec()
    }

    /// Whether a surface id is still registered
    pub fn is_live(&self, id: &str) -> bool {
        self.lock_or_recover().registry.contains(id)
    }

    /// Number of held slots
    pub fn used_slot_count(&self) -> usize {
        self.lock_or_recover().pool.used_count()
    }

    /// Whether a slot is held
    pub fn is_slot_used(&self, slot: SlotId) -> bool {
        self.lock_or_recover().pool.is_used(slot)
    }

    /// Current version of a slot
    ///
    /// # Errors
    ///
    /// Returns `InvalidSlotReference` for out-of-range slots or before the
    /// pool is initialized.
    pub fn slot_version(&self, slot: SlotId) -> Result<u64> {
        self.lock_or_recover().pool.version(slot)
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
