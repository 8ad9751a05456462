//! AK-series Keyboard Clock Sync CLI
//!
//! Sets the on-board display clock of an AK-series keyboard to the local
//! wall-clock time via vendor HID feature reports.
//!
//! Usage:
//!   ak-clock-sync           # sync the AK74 (default)
//!   ak-clock-sync --ak47    # AK47 selection (refused, protocol unverified)

mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use hidapi::HidApi;

use ak_clock_sync::devices;
use ak_clock_sync::hid::{self, ReportExchanger};
use ak_clock_sync::{session, SyncError};
use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            eprintln!("Clock sync failed.");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn run(cli: &Cli) -> Result<()> {
    let def = cli.model().definition();

    println!(
        "Target device: {} (VID {:04X}, PID {:04X}, IF {})",
        def.display_name, def.vid, def.pid, def.interface
    );

    if let Err(e) = devices::check_supported(def) {
        println!(
            "{} clock sync has not been verified; refusing to send an untested protocol.",
            def.display_name
        );
        return Err(e.into());
    }

    // One HidApi per process; dropping it on any exit path is the
    // subsystem teardown.
    let api = HidApi::new().map_err(|e| SyncError::Init(e.to_string()))?;

    let device = hid::open_device(&api, def)?;
    let mut exchanger = ReportExchanger::new(device);

    let synced = session::run(&mut exchanger).context("sync session aborted")?;
    println!("Clock synced: {synced}");
    Ok(())
}
