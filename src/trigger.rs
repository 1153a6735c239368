// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The periodic trigger around the download core.
//!
//! Fires on a fixed interval;
//! each firing first consults the freshness check,
//! and only downloads when no recent enough dump exists.
//! Transient download failures are re-attempted with exponential backoff,
//! configuration errors abort the loop.

use std::time::Duration;
use tokio::time;

use crate::download::{Downloader, Error};
use crate::freshness;
use crate::settings::Settings;

/// How long to wait before re-attempting after consecutive
/// transient failures.
/// Mirrors the classic scheduler backoff triple:
/// first delay, growth factor, upper bound.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub base_delay: Duration,
    pub multiplier: u32,
    pub max_delay: Duration,
}

impl BackoffPolicy {
    /// The delay after the `failures`th consecutive failure (1-based).
    #[must_use]
    pub fn delay(&self, failures: u32) -> Duration {
        let factor = self
            .multiplier
            .saturating_pow(failures.saturating_sub(1));
        self.base_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// Runs the download loop until a non-transient error occurs.
///
/// Each tick that finds a fresh dump on disk is a no-op.
pub async fn run(settings: &Settings, downloader: &Downloader) -> Result<(), Error> {
    let mut consecutive_failures: u32 = 0;
    let mut ticker = time::interval(settings.interval);
    loop {
        ticker.tick().await;

        if freshness::is_fresh(
            &settings.database_type,
            &settings.download_dir,
            settings.period,
        ) {
            tracing::debug!("Download is not needed.");
            consecutive_failures = 0;
            continue;
        }

        match downloader
            .download(settings.database_type.as_str(), &settings.download_dir)
            .await
        {
            Ok(dump_file) => {
                tracing::info!("Downloaded '{}'.", dump_file.display());
                consecutive_failures = 0;
            }
            Err(err) if err.is_transient() => {
                consecutive_failures += 1;
                let delay = settings.backoff.delay(consecutive_failures);
                tracing::warn!(
                    "Download failed ({err}); backing off for {}s.",
                    delay.as_secs()
                );
                time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_and_caps() {
        let policy = BackoffPolicy {
            base_delay: Duration::from_secs(60),
            multiplier: 5,
            max_delay: Duration::from_secs(3600),
        };
        assert_eq!(policy.delay(1), Duration::from_secs(60));
        assert_eq!(policy.delay(2), Duration::from_secs(300));
        assert_eq!(policy.delay(3), Duration::from_secs(1500));
        assert_eq!(policy.delay(4), Duration::from_secs(3600));
        assert_eq!(policy.delay(20), Duration::from_secs(3600));
    }
}
