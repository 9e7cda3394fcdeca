//! Driving the external flashing tool
//!
//! ahflash never speaks the Espressif serial protocol itself. It locates
//! esptool, builds the erase and write invocations, and runs them with
//! inherited stdio so the tool's own progress and diagnostics reach the
//! operator unchanged.

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use log::debug;
use strum::Display;

use crate::{config::FlashSettings, error::Error, firmware::ResolvedFirmware};

/// Directory the fallback checkout is cloned into, relative to the working
/// directory.
const CHECKOUT_DIR: &str = "esptool";
/// Script entry point inside the checkout.
const CHECKOUT_SCRIPT: &str = "esptool.py";
/// Source for the one-time clone when no install is present.
const ESPTOOL_GIT_URL: &str = "https://github.com/espressif/esptool.git";

/// How the external flasher is run.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum FlashTool {
    /// `esptool.py` found on `PATH`.
    #[strum(serialize = "esptool.py")]
    Script(PathBuf),
    /// `esptool` binary found on `PATH`.
    #[strum(serialize = "esptool")]
    Binary(PathBuf),
    /// Local checkout driven through the Python interpreter.
    #[strum(serialize = "esptool (local checkout)")]
    Checkout(PathBuf),
}

impl FlashTool {
    /// Locate the flasher: prefer a `PATH` install, fall back to a local
    /// checkout, cloning one first when it does not exist yet.
    pub fn locate() -> Result<Self, Error> {
        Self::locate_with(env::var_os("PATH"), Path::new(CHECKOUT_DIR), true)
    }

    fn locate_with(
        path_var: Option<OsString>,
        checkout: &Path,
        clone_missing: bool,
    ) -> Result<Self, Error> {
        let cwd = env::current_dir()?;

        if let Ok(found) = which::which_in(CHECKOUT_SCRIPT, path_var.as_ref(), &cwd) {
            return Ok(FlashTool::Script(found));
        }
        if let Ok(found) = which::which_in("esptool", path_var.as_ref(), &cwd) {
            return Ok(FlashTool::Binary(found));
        }

        let script = checkout.join(CHECKOUT_SCRIPT);
        if script.is_file() {
            return Ok(FlashTool::Checkout(script));
        }
        if !clone_missing {
            return Err(Error::EsptoolUnavailable);
        }

        clone_esptool(checkout)?;
        if script.is_file() {
            Ok(FlashTool::Checkout(script))
        } else {
            Err(Error::EsptoolUnavailable)
        }
    }

    /// The erase invocation: wipes the entire flash of the target.
    pub fn erase_command(&self, settings: &FlashSettings, port: &str) -> ToolInvocation {
        let (program, mut args) = self.base();
        args.extend_from_slice(&[
            "--chip".into(),
            settings.chip.into(),
            "--port".into(),
            port.into(),
            "--baud".into(),
            settings.baud.to_string().into(),
            "erase_flash".into(),
        ]);

        ToolInvocation {
            operation: "erase_flash",
            program,
            args,
        }
    }

    /// The write invocation: compressed write of `image` at the application
    /// offset, with the flash size probed from the chip.
    pub fn write_command(
        &self,
        settings: &FlashSettings,
        port: &str,
        image: &Path,
    ) -> ToolInvocation {
        let (program, mut args) = self.base();
        args.extend_from_slice(&[
            "--chip".into(),
            settings.chip.into(),
            "--port".into(),
            port.into(),
            "--baud".into(),
            settings.baud.to_string().into(),
            "--before".into(),
            settings.before_reset.into(),
            "--after".into(),
            settings.after_reset.into(),
            "write_flash".into(),
            "-z".into(),
            "--flash_size".into(),
            "detect".into(),
            format!("{:#x}", settings.offset).into(),
            image.into(),
        ]);

        ToolInvocation {
            operation: "write_flash",
            program,
            args,
        }
    }

    /// Program plus leading arguments shared by every invocation.
    fn base(&self) -> (PathBuf, Vec<OsString>) {
        match self {
            FlashTool::Script(path) | FlashTool::Binary(path) => (path.clone(), Vec::new()),
            FlashTool::Checkout(script) => (PathBuf::from("python3"), vec![script.into()]),
        }
    }
}

/// One-time acquisition of the tool source. Output is inherited so the
/// operator sees git's progress.
fn clone_esptool(checkout: &Path) -> Result<(), Error> {
    println!("esptool not found, cloning {}...", ESPTOOL_GIT_URL);

    let status = Command::new("git")
        .args(["clone", "--depth", "1", ESPTOOL_GIT_URL])
        .arg(checkout)
        .status()
        .map_err(|source| Error::ToolSpawn {
            program: "git".into(),
            source,
        })?;

    if !status.success() {
        return Err(Error::EsptoolUnavailable);
    }

    Ok(())
}

/// A single external-tool invocation: the program to run and its ordered
/// argument list. Success means exit status zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    operation: &'static str,
    program: PathBuf,
    args: Vec<OsString>,
}

impl ToolInvocation {
    /// Run to completion with inherited stdio.
    pub fn run(&self) -> Result<(), Error> {
        debug!("running {:?} with {:?}", self.program, self.args);

        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|source| Error::ToolSpawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !status.success() {
            return Err(Error::ToolFailed {
                operation: self.operation,
                status,
            });
        }

        Ok(())
    }
}

/// Erase then write. A failed erase means the write is never attempted.
pub fn flash(
    tool: &FlashTool,
    settings: &FlashSettings,
    port: &str,
    firmware: &ResolvedFirmware,
) -> Result<(), Error> {
    println!();
    println!("Erasing flash on {port}...");
    tool.erase_command(settings, port).run()?;

    println!();
    println!(
        "Writing {} to {port} at {:#x}...",
        firmware.display_name, settings.offset
    );
    tool.write_command(settings, port, &firmware.path).run()?;

    Ok(())
}
