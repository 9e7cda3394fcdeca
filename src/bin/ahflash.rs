use std::{io, path::PathBuf, process::exit};

use ahflash::{
    cli,
    config::Config,
    device, firmware,
    flasher::{self, FlashTool},
    logging::initialize_logger,
    rtc,
};
use clap::{error::ErrorKind, Parser};
use log::{debug, warn, LevelFilter};
use miette::Result;

#[derive(Debug, Parser)]
#[clap(about, version)]
struct Cli {
    /// Flash a local firmware image instead of downloading from the catalog
    #[clap(short, long)]
    file: Option<PathBuf>,

    /// Print the available catalog firmware and exit
    #[clap(short, long)]
    list: bool,
}

fn main() -> Result<()> {
    miette::set_panic_hook();
    initialize_logger(LevelFilter::Info);

    // Usage problems report exit code 1; clap's default error exit is 2.
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => return Ok(()),
                _ => exit(1),
            }
        }
    };
    debug!("{:#?}", args);

    let config = Config::default();

    if args.list {
        for entry in config.catalog {
            println!("{}", entry.label);
        }
        return Ok(());
    }

    run(&args, &config)
}

fn run(args: &Cli, config: &Config) -> Result<()> {
    let mut input = io::stdin().lock();
    let mut output = io::stdout();

    cli::banner(&mut output)?;

    let firmware = firmware::resolve(config, args.file.as_deref(), &mut input, &mut output)?;
    println!("Firmware: {}", firmware.display_name);

    let lister = device::lister_for(device::host_class());
    let port = cli::select_device(lister.as_ref(), &mut input, &mut output)?;
    println!("Serial port: {port}");

    let tool = FlashTool::locate()?;
    println!("Using {tool}");

    flasher::flash(&tool, &config.flash, &port, &firmware)?;

    // Best-effort: the flash has already succeeded at this point.
    if let Err(err) = rtc::sync_clock(&port) {
        warn!("Clock sync failed: {err}");
    }

    firmware::cleanup(&firmware);

    println!();
    println!("Firmware flashing complete!");

    Ok(())
}
