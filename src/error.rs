//! Library and application errors

use std::{io, path::PathBuf, process::ExitStatus};

use miette::Diagnostic;
use thiserror::Error;

/// All possible errors returned by ahflash
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Cannot derive a file name from URL '{0}'")]
    #[diagnostic(code(ahflash::bad_asset_url))]
    BadAssetUrl(String),

    #[error("Operation was cancelled by the user")]
    #[diagnostic(code(ahflash::cancelled))]
    Cancelled,

    #[error("Failed to download '{url}'")]
    #[diagnostic(
        code(ahflash::download_failed),
        help("Check your network connection, and that the release asset still exists")
    )]
    DownloadFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("esptool could not be found or fetched")]
    #[diagnostic(
        code(ahflash::esptool_unavailable),
        help("Install it with `pip install esptool`, or make sure `git` and `python3` are present so a local copy can be cloned")
    )]
    EsptoolUnavailable,

    #[error("Firmware file '{0}' not found")]
    #[diagnostic(
        code(ahflash::firmware_not_found),
        help("Check the path given to `-f/--file` (or entered at the prompt) and try again")
    )]
    FirmwareNotFound(PathBuf),

    #[error("Failed to save firmware to '{path}'")]
    #[diagnostic(code(ahflash::firmware_save))]
    FirmwareSave {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Firmware file '{path}' is not readable")]
    #[diagnostic(code(ahflash::firmware_unreadable))]
    FirmwareUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("No USB serial devices could be detected")]
    #[diagnostic(
        code(ahflash::no_serial),
        help("Make sure the device is connected to the host system and has finished enumerating before running ahflash again")
    )]
    NoSerial,

    #[error("Serial port error")]
    #[diagnostic(code(ahflash::serial_port))]
    Serial(#[from] serialport::Error),

    #[error("esptool {operation} failed ({status})")]
    #[diagnostic(
        code(ahflash::tool_failed),
        help("The tool's own output above explains the failure")
    )]
    ToolFailed {
        operation: &'static str,
        status: ExitStatus,
    },

    #[error("Failed to launch '{program}'")]
    #[diagnostic(code(ahflash::tool_spawn))]
    ToolSpawn {
        program: String,
        #[source]
        source: io::Error,
    },
}
