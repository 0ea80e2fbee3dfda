/// Live surface registry.
///
/// Maps surface ids to what teardown needs (slot, native surface, debug
/// logger). Iteration follows insertion order so the session-end sweep
/// removes surfaces in creation order.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::backend::SurfaceHandle;
use crate::log::Logger;
use crate::pool::SlotId;

/// Teardown data for one live surface
pub(crate) struct DuiRecord {
    pub slot: SlotId,
    pub surface: SurfaceHandle,
    /// Present only for surfaces created with `debug = true`
    pub logger: Option<Arc<dyn Logger>>,
}

pub(crate) struct Registry {
    records: FxHashMap<String, DuiRecord>,
    order: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            records: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    pub fn insert(&mut self, id: String, record: DuiRecord) {
        if self.records.insert(id.clone(), record).is_none() {
            self.order.push(id);
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<DuiRecord> {
        let record = self.records.remove(id)?;
        self.order.retain(|entry| entry != id);
        Some(record)
    }

    pub fn get(&self, id: &str) -> Option<&DuiRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Ids in insertion order
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
