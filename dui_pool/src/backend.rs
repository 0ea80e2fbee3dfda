/// Native surface backend trait and opaque handle types.
///
/// The backend is the host's graphics/browser layer. It creates the actual
/// browser surfaces and runtime textures; the pool only decides which slot
/// and texture name each surface gets.

use std::fmt;
use crate::error::Result;

/// Shared runtime texture dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DictionaryHandle(pub u64);

/// Native browser surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// Runtime texture created from a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Addressable reference to a native surface, usable for texture binding
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressableHandle(pub String);

impl fmt::Display for AddressableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Native surface backend
///
/// All calls are synchronous from the pool's point of view. Errors are
/// returned to the caller untouched; the pool never retries.
pub trait SurfaceBackend: Send {
    /// Create the pool-wide texture dictionary (called at most once per pool)
    fn create_texture_dictionary(&mut self, name: &str) -> Result<DictionaryHandle>;

    /// Create a browser surface of the given size showing `url`
    fn create_surface(&mut self, url: &str, width: u32, height: u32) -> Result<SurfaceHandle>;

    /// Destroy a browser surface
    ///
    /// Behavior on double destroy is backend-defined; the pool never
    /// destroys the same surface twice.
    fn destroy_surface(&mut self, surface: SurfaceHandle) -> Result<()>;

    /// Get the addressable handle of a surface
    fn addressable_handle(&mut self, surface: SurfaceHandle) -> Result<AddressableHandle>;

    /// Bind a surface into the dictionary under `texture_name`
    fn bind_texture(
        &mut self,
        dictionary: DictionaryHandle,
        texture_name: &str,
        addressable: &AddressableHandle,
    ) -> Result<TextureHandle>;

    /// Point a surface at a new url
    fn set_surface_url(&mut self, surface: SurfaceHandle, url: &str) -> Result<()>;

    /// Deliver an already serialized message to a surface
    fn send_surface_message(&mut self, surface: SurfaceHandle, message: &str) -> Result<()>;
}
