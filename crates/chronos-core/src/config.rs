use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Tunables of the main-loop runtime, persisted with `postcard`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Menu navigation closes after this many seconds without input
    pub menu_timeout_secs: u8,
    /// Field edit ends after this many seconds without input
    pub edit_timeout_secs: u8,
    /// Add a battery sample request to every minute message
    pub battery_monitor: bool,
}

impl RuntimeConfig {
    pub const DEFAULT: Self = Self {
        menu_timeout_secs: 5,
        edit_timeout_secs: 15,
        battery_monitor: true,
    };

    /// Encode into `buf`, returning the used prefix.
    pub fn to_slice<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], CoreError> {
        postcard::to_slice(self, buf).map_err(|_| CoreError::ConfigEncode)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        postcard::from_bytes(bytes).map_err(|_| CoreError::ConfigDecode)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
