// SPDX-FileCopyrightText: 2021-2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

mod cli;

use async_std::{fs, path};
use clap::crate_name;
use cli_utils::logging;
use cli_utils::BoxResult;
use fs4::async_std::AsyncFileExt;
use i2l_scraper::download::Downloader;
use i2l_scraper::settings;
use i2l_scraper::transfer::HttpTransfer;
use i2l_scraper::trigger;
use tracing::instrument;
use tracing_subscriber::filter::LevelFilter;

#[allow(clippy::print_stdout)]
fn print_version_and_exit(quiet: bool) {
    if !quiet {
        print!("{} ", clap::crate_name!());
    }
    println!("{}", i2l_scraper::VERSION);
    std::process::exit(0);
}

#[tokio::main]
#[instrument]
async fn main() -> BoxResult<()> {
    let log_reload_handle = logging::setup(crate_name!())?;
    let args = cli::args_matcher().get_matches();

    let quiet = args.get_flag(cli::A_L_QUIET);
    let version = args.get_flag(cli::A_L_VERSION);
    if version {
        print_version_and_exit(quiet);
    }

    let verbose = args.get_flag(cli::A_L_VERBOSE);

    let log_level = if verbose {
        LevelFilter::TRACE
    } else if quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };
    logging::set_log_level_tracing(&log_reload_handle, log_level)?;

    // Guards the at-most-one-running-instance assumption;
    // overlapping downloads into the same dir are not coordinated otherwise.
    let lock_file_path = path::PathBuf::from("/tmp/i2l-scraper.lock");
    if !lock_file_path.exists().await {
        fs::File::create(&lock_file_path).await?;
    }

    tracing::debug!("Preparing to lock file '{}' ...", lock_file_path.display());
    let lock_file = fs::File::open(&lock_file_path).await?;
    if !lock_file.try_lock_exclusive()? {
        return Err(format!("Failed to lock file '{}'", lock_file_path.display()).into());
    }
    tracing::debug!("Obtained lock on file '{}'.", lock_file_path.display());

    let run_settings = settings::load()?;
    let transfer = HttpTransfer::new(
        &run_settings.user_agent,
        run_settings.retries,
        run_settings.timeout,
    );
    let downloader = Downloader::new(run_settings.token.clone(), Box::new(transfer));

    tracing::info!(
        "Fetching IP2Location '{}' dumps into '{}', at most once per {} ...",
        run_settings.database_type,
        run_settings.download_dir.display(),
        run_settings.period,
    );
    let run_res = trigger::run(&run_settings, &downloader).await;

    tracing::trace!("Releasing lock on file '{}' ...", lock_file_path.display());
    lock_file.unlock()?;
    tracing::info!("Released lock on file '{}'.", lock_file_path.display());

    run_res?;

    Ok(())
}
