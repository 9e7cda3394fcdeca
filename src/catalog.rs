//! Built-in firmware catalog
//!
//! The catalog is the set of release images ahflash knows how to fetch on
//! its own. Entries are compiled in; there is no remote index to consult, so
//! `--list` and the interactive menu work without touching the network.

use crate::error::Error;

/// A downloadable firmware image built into the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Name shown by `--list` and in the firmware menu. Unique within the
    /// catalog.
    pub label: &'static str,
    /// Release asset the image is fetched from.
    pub url: &'static str,
}

/// Firmware images offered by the interactive menu, in menu order.
pub const ENTRIES: &[CatalogEntry] = &[
    CatalogEntry {
        label: "AntiHunter",
        url: "https://github.com/lukeswitz/Antihunter/releases/latest/download/antihunter.bin",
    },
    CatalogEntry {
        label: "AntiHunter Headless",
        url: "https://github.com/lukeswitz/Antihunter/releases/latest/download/antihunter-headless.bin",
    },
];

impl CatalogEntry {
    /// Local file name a download of this entry is saved under: the final
    /// path segment of the source URL.
    pub fn file_name(&self) -> Result<&'static str, Error> {
        self.url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::BadAssetUrl(self.url.to_string()))
    }
}
