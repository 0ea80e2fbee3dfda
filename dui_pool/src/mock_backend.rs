/// Mock surface backend for unit tests (no host graphics layer required)
///
/// Hands out sequential handles, records every call, and can be told to
/// fail specific operations.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashSet;
use crate::backend::{
    AddressableHandle, DictionaryHandle, SurfaceBackend, SurfaceHandle, TextureHandle,
};
use crate::error::Result;
use crate::dui_bail;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    CreateDictionary(String),
    CreateSurface { url: String, width: u32, height: u32 },
    DestroySurface(SurfaceHandle),
    AddressableHandle(SurfaceHandle),
    BindTexture { dictionary: DictionaryHandle, name: String, addressable: AddressableHandle },
    SetUrl { surface: SurfaceHandle, url: String },
    SendMessage { surface: SurfaceHandle, message: String },
}

/// State shared between the mock and the test that installed it
#[derive(Debug, Default)]
pub struct MockState {
    pub calls: Vec<MockCall>,
    pub live_surfaces: FxHashSet<SurfaceHandle>,
    pub fail_create_dictionary: bool,
    pub fail_create_surface: bool,
    pub fail_bind_texture: bool,
    pub fail_destroy_surface: bool,
}

impl MockState {
    pub fn count(&self, pred: impl Fn(&MockCall) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }
}

pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
    next_handle: u64,
}

impl MockBackend {
    pub fn new() -> (Self, Arc<Mutex<MockState>>) {
        let state = Arc::new(Mutex::new(MockState::default()));
        (Self { state: state.clone(), next_handle: 1 }, state)
    }

    fn next(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn record(&self, call: MockCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl SurfaceBackend for MockBackend {
    fn create_texture_dictionary(&mut self, name: &str) -> Result<DictionaryHandle> {
        self.record(MockCall::CreateDictionary(name.to_string()));
        if self.state.lock().unwrap().fail_create_dictionary {
            dui_bail!("dui::mock", "CreateRuntimeTxd failed for '{}'", name);
        }
        Ok(DictionaryHandle(self.next()))
    }

    fn create_surface(&mut self, url: &str, width: u32, height: u32) -> Result<SurfaceHandle> {
        self.record(MockCall::CreateSurface { url: url.to_string(), width, height });
        if self.state.lock().unwrap().fail_create_surface {
            dui_bail!("dui::mock", "CreateDui failed for '{}'", url);
        }
        let surface = SurfaceHandle(self.next());
        self.state.lock().unwrap().live_surfaces.insert(surface);
        Ok(surface)
    }

    fn destroy_surface(&mut self, surface: SurfaceHandle) -> Result<()> {
        self.record(MockCall::DestroySurface(surface));
        let mut state = self.state.lock().unwrap();
        state.live_surfaces.remove(&surface);
        if state.fail_destroy_surface {
            drop(state);
            dui_bail!("dui::mock", "DestroyDui failed for {:?}", surface);
        }
        Ok(())
    }

    fn addressable_handle(&mut self, surface: SurfaceHandle) -> Result<AddressableHandle> {
        self.record(MockCall::AddressableHandle(surface));
        Ok(AddressableHandle(format!("dui://{}", surface.0)))
    }

    fn bind_texture(
        &mut self,
        dictionary: DictionaryHandle,
        texture_name: &str,
        addressable: &AddressableHandle,
    ) -> Result<TextureHandle> {
        self.record(MockCall::BindTexture {
            dictionary,
            name: texture_name.to_string(),
            addressable: addressable.clone(),
        });
        if self.state.lock().unwrap().fail_bind_texture {
            dui_bail!("dui::mock", "CreateRuntimeTextureFromDuiHandle failed for '{}'", texture_name);
        }
        Ok(TextureHandle(self.next()))
    }

    fn set_surface_url(&mut self, surface: SurfaceHandle, url: &str) -> Result<()> {
        self.record(MockCall::SetUrl { surface, url: url.to_string() });
        Ok(())
    }

    fn send_surface_message(&mut self, surface: SurfaceHandle, message: &str) -> Result<()> {
        self.record(MockCall::SendMessage { surface, message: message.to_string() });
        Ok(())
    }
}
