/// Pool configuration.
///
/// Capacity and naming are fixed once a `PoolContext` is built from this
/// config; the pool never grows.

use crate::error::{Error, Result};

/// Default number of texture slots
pub const DEFAULT_CAPACITY: usize = 50;

/// Configuration for a `PoolContext`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of slots (maximum number of live surfaces)
    pub capacity: usize,
    /// Name of the shared runtime texture dictionary
    pub dictionary_name: String,
    /// Prefix for generated texture names (`<prefix>_<slot>_v<version>`)
    pub texture_prefix: String,
    /// Neutral target set on a surface right before it is destroyed
    pub blank_url: String,
    /// Caller-scope identifier, used in surface ids and matched by the
    /// session-end signal
    pub resource_name: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            dictionary_name: "dui_pool".to_string(),
            texture_prefix: "dui_txt".to_string(),
            blank_url: "about:blank".to_string(),
            resource_name: "dui".to_string(),
        }
    }
}

impl PoolConfig {
    /// Default config with a different capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Default config with a different caller-scope identifier
    pub fn with_resource_name(mut self, resource_name: &str) -> Self {
        self.resource_name = resource_name.to_string();
        self
    }

    /// Check that the config can back a pool
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if the capacity is zero or any of the
    /// names is empty.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InitializationFailed(
                "Pool capacity must be at least 1".to_string()
            ));
        }
        for (field, value) in [
            ("dictionary_name", &self.dictionary_name),
            ("texture_prefix", &self.texture_prefix),
            ("resource_name", &self.resource_name),
        ] {
            if value.is_empty() {
                return Err(Error::InitializationFailed(
                    format!("PoolConfig::{} must not be empty", field)
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
