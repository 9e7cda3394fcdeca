//! Post-flash device clock sync
//!
//! AntiHunter keeps wall-clock time on an on-board RTC and accepts a
//! `SETTIME:<epoch>` command on its serial console. A freshly flashed
//! device boots with a blank clock, so the host's time is pushed at it
//! right after flashing. The whole exchange is best-effort; a failure here
//! never spoils a completed flash.

use std::{
    io::{BufRead, BufReader, Write},
    thread::sleep,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use log::debug;

use crate::error::Error;

/// Time the firmware needs to boot before its console listens.
const BOOT_DELAY: Duration = Duration::from_secs(3);
/// Settle time between opening the port and sending the command.
const PORT_SETTLE: Duration = Duration::from_secs(1);
/// How long to wait for the acknowledgement line.
const READ_TIMEOUT: Duration = Duration::from_secs(2);
/// Console baud rate of the firmware.
const CONSOLE_BAUD: u32 = 115_200;

/// Push the host clock to the device on `port`.
pub fn sync_clock(port: &str) -> Result<(), Error> {
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    println!();
    println!("Setting device clock to host time ({epoch})...");
    sleep(BOOT_DELAY);

    let mut serial = serialport::new(port, CONSOLE_BAUD)
        .timeout(READ_TIMEOUT)
        .open()?;
    sleep(PORT_SETTLE);

    serial.write_all(command(epoch).as_bytes())?;
    serial.flush()?;

    // the firmware echoes a single confirmation line; show it if one comes
    let mut reader = BufReader::new(serial);
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(n) if n > 0 => println!("Device reports: {}", line.trim()),
        Ok(_) => debug!("no clock acknowledgement from {port}"),
        Err(err) => debug!("no clock acknowledgement from {port}: {err}"),
    }

    Ok(())
}

fn command(epoch: u64) -> String {
    format!("SETTIME:{epoch}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_newline_terminated() {
        assert_eq!(command(1_700_000_000), "SETTIME:1700000000\n");
    }
}
