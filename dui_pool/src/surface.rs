/// Dui - one browser surface bound to one pool slot.
///
/// Creating a `Dui` takes a slot, creates the native surface and binds it
/// into the shared texture dictionary under the slot's versioned name.
/// `remove()` (or dropping the handle) blanks and destroys the surface and
/// returns the slot. The teardown runs at most once per handle, even when
/// the session-end sweep got to it first.

use std::sync::Arc;
use serde::Serialize;
use crate::backend::{AddressableHandle, SurfaceHandle, TextureHandle};
use crate::context::PoolContext;
use crate::error::{Error, Result};
use crate::log::{LogEntry, LogSeverity, Logger};
use crate::pool::SlotId;

/// Creation parameters for a `Dui`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuiDesc {
    /// Initial url
    pub url: String,
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Emit lifecycle debug logs for this surface
    pub debug: bool,
}

impl DuiDesc {
    /// Non-debug descriptor
    pub fn new(url: &str, width: u32, height: u32) -> Self {
        Self {
            url: url.to_string(),
            width,
            height,
            debug: false,
        }
    }

    /// Same descriptor with debug logging switched on or off
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Emit a per-surface debug entry if the surface has a logger
pub(crate) fn debug_log(logger: Option<&Arc<dyn Logger>>, message: impl FnOnce() -> String) {
    if let Some(logger) = logger {
        logger.log(&LogEntry::new(LogSeverity::Debug, "dui::Dui", message()));
    }
}

/// Browser-backed texture tied to one slot of a `PoolContext`
pub struct Dui {
    context: Arc<PoolContext>,
    id: String,
    slot: SlotId,
    version: u64,
    url: String,
    surface: SurfaceHandle,
    dui_handle: AddressableHandle,
    texture: TextureHandle,
    texture_name: String,
    logger: Option<Arc<dyn Logger>>,
}

impl Dui {
    /// Create a surface in `context`
    ///
    /// # Errors
    ///
    /// Returns `CreationFailed` carrying the requested url and size, wrapping:
    /// - `PoolExhausted` when every slot is held (no native call is made)
    /// - native backend errors, wrapped as well; match the original through
    ///   `Error::root()`
    /// - `InitializationFailed` if the context lock was poisoned
    ///
    /// A failed creation leaves no slot held and no registry entry.
    pub fn new(context: &Arc<PoolContext>, desc: DuiDesc) -> Result<Self> {
        let created = context.create_surface(&desc).map_err(|err| Error::CreationFailed {
            url: desc.url.clone(),
            width: desc.width,
            height: desc.height,
            source: Box::new(err),
        })?;

        let dui = Self {
            context: context.clone(),
            id: created.id,
            slot: created.slot,
            version: created.version,
            url: desc.url,
            surface: created.surface,
            dui_handle: created.dui_handle,
            texture: created.texture,
            texture_name: created.texture_name,
            logger: created.logger,
        };

        debug_log(dui.logger.as_ref(), || format!("Dui {} created (slot {})", dui.id, dui.slot));
        Ok(dui)
    }

    /// Point the surface at a new url
    ///
    /// # Errors
    ///
    /// - `InvalidResource` if the surface was already swept
    /// - native backend errors, unchanged
    pub fn set_url(&mut self, url: &str) -> Result<()> {
        self.context.with_live_surface(&self.id, |backend, surface| {
            backend.set_surface_url(surface, url)
        })?;
        self.url = url.to_string();

        debug_log(self.logger.as_ref(), || format!("Dui {} url set to {}", self.id, url));
        Ok(())
    }

    /// Serialize `payload` as JSON and send it to the surface
    ///
    /// Slot and pool state are never touched.
    ///
    /// # Errors
    ///
    /// - `SerializationError` if `payload` cannot be encoded
    /// - `InvalidResource` if the surface was already swept
    /// - native backend errors, unchanged
    pub fn send_message<T: Serialize + ?Sized>(&self, payload: &T) -> Result<()> {
        let message = serde_json::to_string(payload)?;
        self.context.with_live_surface(&self.id, |backend, surface| {
            backend.send_surface_message(surface, &message)
        })?;

        debug_log(self.logger.as_ref(),
            || format!("Dui {} message sent with data : {}", self.id, message));
        Ok(())
    }

    /// Blank and destroy the surface, then return its slot
    ///
    /// Consumes the handle. If the session-end sweep already removed it,
    /// nothing happens.
    pub fn remove(self) {
        // Drop runs the teardown
    }

    /// Process-unique id (`<resource>_<ms>_<counter>`)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current url
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Slot held by this surface
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// Slot version at acquisition
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Native surface
    pub fn surface(&self) -> SurfaceHandle {
        self.surface
    }

    /// Addressable handle of the native surface
    pub fn dui_handle(&self) -> &AddressableHandle {
        &self.dui_handle
    }

    /// Runtime texture bound in the shared dictionary
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Shared dictionary name, for drawing the texture
    pub fn dictionary_name(&self) -> &str {
        self.context.dictionary_name()
    }

    /// Texture name within the dictionary
    pub fn texture_name(&self) -> &str {
        &self.texture_name
    }

    /// Whether lifecycle debug logs are emitted
    pub fn is_debug(&self) -> bool {
        self.logger.is_some()
    }

    /// Whether the native surface is still alive
    pub fn is_live(&self) -> bool {
        self.context.is_live(&self.id)
    }
}

impl Drop for Dui {
    fn drop(&mut self) {
        self.context.remove_surface(&self.id);
    }
}

impl std::fmt::Debug for Dui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dui")
            .field("id", &self.id)
            .field("slot", &self.slot)
            .field("version", &self.version)
            .field("url", &self.url)
            .field("texture_name", &self.texture_name)
            .finish()
    }
}

#[cfg(test)]
#[path = "surface_tests.rs"]
mod tests;
