//! Firmware resolution and cleanup
//!
//! Exactly one firmware image enters the flash stage per run. It comes from
//! the built-in catalog (downloaded on demand) or from a file the operator
//! supplies, and the two are tracked apart so cleanup never deletes a file
//! the user owns.

use std::{
    fs,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::{catalog::CatalogEntry, cli::prompt, config::Config, download, error::Error};

/// Menu slot offered after the catalog entries.
const CUSTOM_SLOT: &str = "Custom firmware file";

/// The firmware image a run will flash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFirmware {
    /// Name shown in status output.
    pub display_name: String,
    /// Image location on the local filesystem.
    pub path: PathBuf,
    /// Set only when this run downloaded the file. Temporary images are
    /// removed by [`cleanup`] once flashing succeeds.
    pub temporary: bool,
}

/// What the operator picked from the firmware menu.
#[derive(Debug, PartialEq)]
enum Choice {
    Catalog(&'static CatalogEntry),
    Custom,
}

/// Resolve the firmware for this run: the `-f/--file` argument when one was
/// given, otherwise whatever the operator picks from the menu.
pub fn resolve<R, W>(
    config: &Config,
    custom: Option<&Path>,
    input: &mut R,
    output: &mut W,
) -> Result<ResolvedFirmware, Error>
where
    R: BufRead,
    W: Write,
{
    if let Some(path) = custom {
        return custom_firmware(path);
    }

    match choose(config, input, output)? {
        Choice::Catalog(entry) => {
            let path = download::fetch(entry)?;
            Ok(ResolvedFirmware {
                display_name: entry.label.to_string(),
                path,
                temporary: true,
            })
        }
        Choice::Custom => {
            let line = prompt::read_line(input, output, "Path to firmware file")?;
            custom_firmware(Path::new(&line))
        }
    }
}

fn choose<R, W>(config: &Config, input: &mut R, output: &mut W) -> Result<Choice, Error>
where
    R: BufRead,
    W: Write,
{
    let mut items = config
        .catalog
        .iter()
        .map(|entry| entry.label)
        .collect::<Vec<_>>();
    items.push(CUSTOM_SLOT);

    prompt::render_menu(output, "Available firmware:", &items)?;
    let choice = prompt::read_selection(input, output, "Select firmware", items.len())?;

    // the final slot is the custom-file escape hatch
    Ok(match config.catalog.get(choice - 1) {
        Some(entry) => Choice::Catalog(entry),
        None => Choice::Custom,
    })
}

/// A user-supplied image: must already exist and be readable, and is never
/// deleted.
fn custom_firmware(path: &Path) -> Result<ResolvedFirmware, Error> {
    if !path.is_file() {
        return Err(Error::FirmwareNotFound(path.to_path_buf()));
    }
    fs::File::open(path).map_err(|source| Error::FirmwareUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let display_name = match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    };

    Ok(ResolvedFirmware {
        display_name,
        path: path.to_path_buf(),
        temporary: false,
    })
}

/// Remove the image this run downloaded. User-supplied files are left
/// alone, and a failed removal only warns: the flash itself has already
/// succeeded by the time this runs.
pub fn cleanup(firmware: &ResolvedFirmware) {
    if !firmware.temporary {
        debug!("keeping user-supplied firmware at {}", firmware.path.display());
        return;
    }

    println!("Cleaning up {}...", firmware.path.display());
    if let Err(err) = fs::remove_file(&firmware.path) {
        warn!("Failed to remove {}: {}", firmware.path.display(), err);
    }
}
