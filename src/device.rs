//! USB serial device discovery
//!
//! Candidates are plain device paths gathered from the filesystem, the same
//! set a shell glob over `/dev` would produce. Flashing talks to whatever
//! path the operator picks; nothing here opens a port.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use strum::Display;

/// Host classes with distinct discovery rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum HostClass {
    Linux,
    Macos,
    Unsupported,
}

/// Host class of the running binary.
pub fn host_class() -> HostClass {
    if cfg!(target_os = "linux") {
        HostClass::Linux
    } else if cfg!(target_os = "macos") {
        HostClass::Macos
    } else {
        HostClass::Unsupported
    }
}

/// The device lister matching a host class.
pub fn lister_for(host: HostClass) -> Box<dyn DeviceLister> {
    debug!("using {host} device discovery");

    match host {
        HostClass::Linux => Box::new(LinuxLister::new()),
        HostClass::Macos => Box::new(MacosLister::new()),
        HostClass::Unsupported => Box::new(UnsupportedLister),
    }
}

/// Lists the serial device candidates visible on the host, in stable order.
pub trait DeviceLister {
    fn list(&self) -> Vec<String>;
}

/// Linux discovery: `ttyACM*` and `ttyUSB*` device nodes, with the stable
/// `serial/by-id` and `serial/by-path` aliases as fallbacks for hosts where
/// the plain nodes are hidden or oddly named.
pub struct LinuxLister {
    dev: PathBuf,
}

impl LinuxLister {
    pub fn new() -> Self {
        Self::at("/dev")
    }

    /// Discovery rooted at `dev` instead of `/dev`.
    pub fn at(dev: impl Into<PathBuf>) -> Self {
        LinuxLister { dev: dev.into() }
    }
}

impl DeviceLister for LinuxLister {
    fn list(&self) -> Vec<String> {
        let direct = matching_entries(&self.dev, |name| {
            name.starts_with("ttyACM") || name.starts_with("ttyUSB")
        });
        if !direct.is_empty() {
            return direct;
        }

        for alias in ["serial/by-id", "serial/by-path"] {
            let found = matching_entries(&self.dev.join(alias), |_| true);
            if !found.is_empty() {
                return found;
            }
        }

        Vec::new()
    }
}

/// macOS discovery: call-out devices (`cu.*`) whose name suggests a USB
/// serial bridge. The matching `tty.*` nodes block until carrier detect, so
/// they are never offered.
pub struct MacosLister {
    dev: PathBuf,
}

impl MacosLister {
    pub fn new() -> Self {
        Self::at("/dev")
    }

    /// Discovery rooted at `dev` instead of `/dev`.
    pub fn at(dev: impl Into<PathBuf>) -> Self {
        MacosLister { dev: dev.into() }
    }
}

impl DeviceLister for MacosLister {
    fn list(&self) -> Vec<String> {
        matching_entries(&self.dev, |name| {
            let lower = name.to_lowercase();
            lower.starts_with("cu.")
                && ["usbmodem", "usbserial", "usb", "serial"]
                    .iter()
                    .any(|hint| lower.contains(hint))
        })
    }
}

/// Hosts without discovery rules: nothing is ever found.
pub struct UnsupportedLister;

impl DeviceLister for UnsupportedLister {
    fn list(&self) -> Vec<String> {
        Vec::new()
    }
}

fn matching_entries<F>(dir: &Path, keep: F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut found = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            keep(&name).then(|| entry.path().to_string_lossy().into_owned())
        })
        .collect::<Vec<_>>();

    // read_dir order is platform-dependent; globs expand sorted
    found.sort();

    found
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::*;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    fn path_of(dir: &Path, name: &str) -> String {
        dir.join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn linux_prefers_direct_device_nodes() {
        let dev = tempfile::tempdir().unwrap();
        touch(dev.path(), "ttyUSB0");
        touch(dev.path(), "ttyACM0");
        touch(dev.path(), "ttyS0");
        touch(dev.path(), "sda");

        fs::create_dir_all(dev.path().join("serial/by-id")).unwrap();
        touch(&dev.path().join("serial/by-id"), "usb-Espressif-if00");

        let found = LinuxLister::at(dev.path()).list();
        assert_eq!(
            found,
            [path_of(dev.path(), "ttyACM0"), path_of(dev.path(), "ttyUSB0")]
        );
    }

    #[test]
    fn linux_falls_back_to_by_id_aliases() {
        let dev = tempfile::tempdir().unwrap();
        touch(dev.path(), "ttyS0");

        let by_id = dev.path().join("serial/by-id");
        fs::create_dir_all(&by_id).unwrap();
        touch(&by_id, "usb-Espressif-if00");

        let found = LinuxLister::at(dev.path()).list();
        assert_eq!(found, [path_of(&by_id, "usb-Espressif-if00")]);
    }

    #[test]
    fn linux_falls_back_to_by_path_aliases_last() {
        let dev = tempfile::tempdir().unwrap();

        let by_path = dev.path().join("serial/by-path");
        fs::create_dir_all(&by_path).unwrap();
        touch(&by_path, "pci-0000:00:14.0-usb-0:1:1.0");

        let found = LinuxLister::at(dev.path()).list();
        assert_eq!(found, [path_of(&by_path, "pci-0000:00:14.0-usb-0:1:1.0")]);
    }

    #[test]
    fn linux_reports_nothing_when_nothing_matches() {
        let dev = tempfile::tempdir().unwrap();
        touch(dev.path(), "ttyS0");

        assert!(LinuxLister::at(dev.path()).list().is_empty());
    }

    #[test]
    fn macos_keeps_usb_callout_devices_only() {
        let dev = tempfile::tempdir().unwrap();
        touch(dev.path(), "cu.usbserial-1410");
        touch(dev.path(), "cu.usbmodem14101");
        touch(dev.path(), "cu.Bluetooth-Incoming-Port");
        touch(dev.path(), "tty.usbserial-1410");

        let found = MacosLister::at(dev.path()).list();
        assert_eq!(
            found,
            [
                path_of(dev.path(), "cu.usbmodem14101"),
                path_of(dev.path(), "cu.usbserial-1410"),
            ]
        );
    }

    #[test]
    fn unsupported_hosts_find_nothing() {
        assert!(UnsupportedLister.list().is_empty());
    }
}
