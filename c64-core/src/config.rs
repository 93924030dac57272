//! Machine configuration.
//!
//! Passed explicitly to [`crate::Machine::new`]; nothing is read from globals.
//! Every field has a default so partial JSON documents are accepted.

use crate::error::{Error, Result};
use crate::system::machine::CYCLES_PER_FRAME;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Ticks between polls of the host input source.
    pub input_poll_interval: u32,

    /// Install the KERNAL serial-bus patches at construction.
    pub kernal_serial_patches: bool,

    /// Breakpoints installed at construction.
    pub breakpoints: Vec<u16>,

    /// Inclusive PC ranges traced at construction.
    pub tracepoints: Vec<(u16, u16)>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            input_poll_interval: CYCLES_PER_FRAME,
            kernal_serial_patches: true,
            breakpoints: Vec::new(),
            tracepoints: Vec::new(),
        }
    }
}

impl MachineConfig {
    /// Parses a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(Error::Config)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MachineConfig::from_json(r#"{ "breakpoints": [49152] }"#).unwrap();
        assert_eq!(config.breakpoints, vec![0xC000]);
        assert_eq!(config.input_poll_interval, CYCLES_PER_FRAME);
        assert!(config.kernal_serial_patches);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = MachineConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = MachineConfig {
            input_poll_interval: 100,
            kernal_serial_patches: false,
            breakpoints: vec![0x1000],
            tracepoints: vec![(0xE000, 0xE0FF)],
        };
        let text = config.to_json().unwrap();
        assert_eq!(MachineConfig::from_json(&text).unwrap(), config);
    }
}
