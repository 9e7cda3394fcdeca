//! Firmware image download
//!
//! A plain blocking GET against the release asset, streamed to the current
//! working directory. An existing file of the same name is overwritten, so
//! repeated runs do not accumulate copies.

use std::{fs::File, io, path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use crate::{catalog::CatalogEntry, error::Error};

/// How long to wait for the server to accept the connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch `entry` into the current working directory, named after the final
/// path segment of its URL, and return the path written.
pub fn fetch(entry: &CatalogEntry) -> Result<PathBuf, Error> {
    let target = PathBuf::from(entry.file_name()?);

    println!("Downloading {}...", entry.label);
    debug!("GET {}", entry.url);

    let client = reqwest::blocking::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|source| Error::DownloadFailed {
            url: entry.url.into(),
            source,
        })?;

    let response = client
        .get(entry.url)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(|source| Error::DownloadFailed {
            url: entry.url.into(),
            source,
        })?;

    let bar = match response.content_length() {
        Some(length) => ProgressBar::new(length).with_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes}")
                .unwrap()
                .progress_chars("#>-"),
        ),
        None => ProgressBar::new_spinner(),
    };

    let mut reader = bar.wrap_read(response);
    let mut file = File::create(&target).map_err(|source| Error::FirmwareSave {
        path: target.clone(),
        source,
    })?;
    io::copy(&mut reader, &mut file).map_err(|source| Error::FirmwareSave {
        path: target.clone(),
        source,
    })?;
    bar.finish_and_clear();

    println!("Saved {}", target.display());

    Ok(target)
}
