//! Library portion of the `ahflash` firmware flasher
//!
//! The binary is a thin argument-parsing layer; everything it does lives
//! here so it can be exercised by tests.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod device;
pub mod download;
pub mod error;
pub mod firmware;
pub mod flasher;
pub mod logging;
pub mod rtc;

pub use catalog::CatalogEntry;
pub use config::Config;
pub use error::Error;
pub use firmware::ResolvedFirmware;
pub use flasher::FlashTool;
