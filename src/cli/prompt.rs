//! Numbered menus and blocking prompts
//!
//! The firmware menu and the device menu share one contract: print a
//! 1-based list, then ask until the operator enters an integer inside the
//! valid range. Invalid input is never fatal; reaching end-of-input is.

use std::io::{BufRead, Write};

use crossterm::style::Stylize;

use crate::error::Error;

/// Render a 1-based numbered menu of `items` under `title`.
pub fn render_menu<W, S>(out: &mut W, title: &str, items: &[S]) -> Result<(), Error>
where
    W: Write,
    S: AsRef<str>,
{
    writeln!(out)?;
    writeln!(out, "{}", title.bold())?;
    for (index, item) in items.iter().enumerate() {
        writeln!(out, "  {}) {}", index + 1, item.as_ref())?;
    }

    Ok(())
}

/// Ask until the operator enters an integer in `1..=max`, and return it.
/// Closed input (EOF) is treated as cancellation.
pub fn read_selection<R, W>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
    max: usize,
) -> Result<usize, Error>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(out, "{} [1-{}]: ", prompt, max)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(Error::Cancelled);
        }

        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=max).contains(&choice) => return Ok(choice),
            _ => writeln!(out, "Invalid selection, enter a number between 1 and {}.", max)?,
        }
    }
}

/// Ask for a single free-form line, trimmed of surrounding whitespace.
pub fn read_line<R, W>(input: &mut R, out: &mut W, prompt: &str) -> Result<String, Error>
where
    R: BufRead,
    W: Write,
{
    write!(out, "{}: ", prompt)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::Cancelled);
    }

    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn menu_is_one_based() {
        let mut out = Vec::new();
        render_menu(&mut out, "Things:", &["alpha", "beta"]).unwrap();

        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("  1) alpha"));
        assert!(rendered.contains("  2) beta"));
    }

    #[test]
    fn selection_in_range_is_returned() {
        let mut input = Cursor::new(&b"2\n"[..]);
        let mut out = Vec::new();

        let choice = read_selection(&mut input, &mut out, "Select", 3).unwrap();
        assert_eq!(choice, 2);
    }

    #[test]
    fn invalid_input_reprompts_until_valid() {
        let mut input = Cursor::new(&b"x\n-1\n0\n99\n2\n"[..]);
        let mut out = Vec::new();

        let choice = read_selection(&mut input, &mut out, "Select", 3).unwrap();
        assert_eq!(choice, 2);

        let rendered = String::from_utf8(out).unwrap();
        assert_eq!(rendered.matches("Invalid selection").count(), 4);
        assert_eq!(rendered.matches("Select [1-3]:").count(), 5);
    }

    #[test]
    fn end_of_input_cancels() {
        let mut input = Cursor::new(&b""[..]);
        let mut out = Vec::new();

        let result = read_selection(&mut input, &mut out, "Select", 3);
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn free_form_line_is_trimmed() {
        let mut input = Cursor::new(&b"  /tmp/image.bin \n"[..]);
        let mut out = Vec::new();

        let line = read_line(&mut input, &mut out, "Path").unwrap();
        assert_eq!(line, "/tmp/image.bin");
    }

    #[test]
    fn free_form_end_of_input_cancels() {
        let mut input = Cursor::new(&b""[..]);
        let mut out = Vec::new();

        let result = read_line(&mut input, &mut out, "Path");
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
