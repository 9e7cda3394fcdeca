//! Types and functions for the command-line interface
//!
//! Menus and prompts used by the `ahflash` binary. Everything takes its
//! input and output handles as arguments, so the whole interactive flow can
//! be driven from tests.

use std::io::{BufRead, Write};

use crossterm::style::Stylize;

use crate::{device::DeviceLister, error::Error};

pub mod prompt;

/// Program banner shown before the interactive flow.
pub fn banner<W: Write>(out: &mut W) -> Result<(), Error> {
    let title = format!("AntiHunter flasher v{}", env!("CARGO_PKG_VERSION"));
    writeln!(out, "{}", title.bold())?;
    writeln!(out, "Erase and flash AntiHunter firmware onto ESP32 devices")?;

    Ok(())
}

/// Enumerate serial devices through `lister` and ask the operator to pick
/// one.
pub fn select_device<R, W>(
    lister: &dyn DeviceLister,
    input: &mut R,
    output: &mut W,
) -> Result<String, Error>
where
    R: BufRead,
    W: Write,
{
    choose_device(&lister.list(), input, output)
}

/// Menu over an already gathered candidate list. An empty list is fatal;
/// there is nothing to flash to.
pub fn choose_device<R, W>(
    candidates: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<String, Error>
where
    R: BufRead,
    W: Write,
{
    if candidates.is_empty() {
        return Err(Error::NoSerial);
    }

    prompt::render_menu(output, "Detected serial devices:", candidates)?;
    let choice = prompt::read_selection(input, output, "Select device", candidates.len())?;

    Ok(candidates[choice - 1].clone())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    struct Fixed(Vec<String>);

    impl DeviceLister for Fixed {
        fn list(&self) -> Vec<String> {
            self.0.clone()
        }
    }

    #[test]
    fn device_menu_selects_by_number() {
        let candidates = vec!["/dev/ttyUSB0".to_string(), "/dev/ttyUSB1".to_string()];
        let mut input = Cursor::new(&b"2\n"[..]);
        let mut output = Vec::new();

        let port = choose_device(&candidates, &mut input, &mut output).unwrap();
        assert_eq!(port, "/dev/ttyUSB1");
    }

    #[test]
    fn out_of_range_selections_reprompt() {
        let candidates = vec!["/dev/ttyUSB0".to_string(), "/dev/ttyUSB1".to_string()];
        let mut input = Cursor::new(&b"0\n3\n1\n"[..]);
        let mut output = Vec::new();

        let port = choose_device(&candidates, &mut input, &mut output).unwrap();
        assert_eq!(port, "/dev/ttyUSB0");

        let rendered = String::from_utf8(output).unwrap();
        assert_eq!(rendered.matches("Invalid selection").count(), 2);
    }

    #[test]
    fn no_devices_is_fatal_before_any_prompt() {
        let mut input = Cursor::new(&b"1\n"[..]);
        let mut output = Vec::new();

        let result = choose_device(&[], &mut input, &mut output);
        assert!(matches!(result, Err(Error::NoSerial)));
        assert!(output.is_empty());
    }

    #[test]
    fn selection_flows_through_the_lister() {
        let lister = Fixed(vec!["/dev/ttyACM0".to_string()]);
        let mut input = Cursor::new(&b"1\n"[..]);
        let mut output = Vec::new();

        let port = select_device(&lister, &mut input, &mut output).unwrap();
        assert_eq!(port, "/dev/ttyACM0");
    }
}
