//! Run configuration
//!
//! Every run uses the same fixed settings. They are still threaded through
//! the program as an explicit [`Config`] value rather than read from
//! globals, so the pieces that need them stay testable in isolation.

use crate::catalog::{self, CatalogEntry};

/// Settings handed to the external flashing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashSettings {
    /// Target chip, or `"auto"` to let the tool probe for it.
    pub chip: &'static str,
    /// Serial baud rate used while flashing.
    pub baud: u32,
    /// Flash address the application image is written to.
    pub offset: u32,
    /// Reset strategy applied before a write.
    pub before_reset: &'static str,
    /// Reset strategy applied after a write.
    pub after_reset: &'static str,
}

impl Default for FlashSettings {
    fn default() -> Self {
        FlashSettings {
            chip: "auto",
            baud: 115_200,
            offset: 0x10000,
            before_reset: "default_reset",
            after_reset: "hard_reset",
        }
    }
}

/// Immutable configuration assembled once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firmware images offered by the interactive menu.
    pub catalog: &'static [CatalogEntry],
    /// Settings for the flashing tool.
    pub flash: FlashSettings,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            catalog: catalog::ENTRIES,
            flash: FlashSettings::default(),
        }
    }
}
