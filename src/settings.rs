// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use config::{Config, ConfigError};
use const_format::formatcp;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use typed_builder::TypedBuilder;

use crate::model::database_type::{self, DatabaseType};
use crate::model::period::DownloadPeriod;
use crate::transfer;
use crate::trigger::BackoffPolicy;

pub const DEFAULT_USER_AGENT: &str = formatcp!(
    "{} github.com/hoijui/i2l-scraper",
    env!("CARGO_PKG_NAME")
);

/// Seconds between two firings of the download trigger.
const DEFAULT_TICK_INTERVAL: u64 = 60;
/// Backoff after the first failed download attempt, in milliseconds (ms).
const DEFAULT_BACKOFF_BASE_DELAY: u64 = 60_000;
const DEFAULT_BACKOFF_MULTIPLIER: u32 = 5;
/// Upper bound for the backoff delay, in milliseconds (ms).
const DEFAULT_BACKOFF_MAX_DELAY: u64 = 3_600_000;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load the basic/low-level configuration data: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to validate the configured database type: {0}")]
    DatabaseType(#[from] database_type::ParseError),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DownloadSection {
    /// The vendor API token authorizing the download. A secret.
    pub token: String,
    /// Which database product to fetch, e.g. "DB1" or "PX11".
    pub r#type: String,
    /// Where the fetched dumps end up on disk.
    pub dir: PathBuf,
    pub period: DownloadPeriod,
    /// Seconds between two firings of the download trigger.
    #[serde(default = "default_tick_interval")]
    pub interval: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HttpSection {
    /// Number of in-request retries for a single fetch.
    pub retries: u32,
    /// Total timeout per request in milliseconds (ms)
    pub timeout: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            retries: transfer::DEFAULT_RETRIES,
            timeout: transfer::DEFAULT_TIMEOUT,
        }
    }
}

/// Trigger-level backoff between whole download attempts;
/// not to be confused with the in-request retries of [`HttpSection`].
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BackoffSection {
    #[serde(default = "default_backoff_base_delay")]
    pub base_delay: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub multiplier: u32,
    #[serde(default = "default_backoff_max_delay")]
    pub max_delay: u64,
}

impl Default for BackoffSection {
    fn default() -> Self {
        Self {
            base_delay: DEFAULT_BACKOFF_BASE_DELAY,
            multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            max_delay: DEFAULT_BACKOFF_MAX_DELAY,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct IntermediateSettings {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    pub download: DownloadSection,
    #[serde(default)]
    pub http: HttpSection,
    #[serde(default)]
    pub backoff: BackoffSection,
}

#[derive(TypedBuilder)]
pub struct Settings {
    pub user_agent: String,
    pub token: String,
    pub database_type: DatabaseType,
    pub download_dir: PathBuf,
    pub period: DownloadPeriod,
    pub interval: Duration,
    pub retries: u32,
    pub timeout: u64,
    pub backoff: BackoffPolicy,
}

impl IntermediateSettings {
    pub fn finalize(self) -> Result<Settings, SettingsError> {
        let database_type: DatabaseType = self.download.r#type.parse()?;
        Ok(Settings::builder()
            .user_agent(self.user_agent)
            .token(self.download.token)
            .database_type(database_type)
            .download_dir(self.download.dir)
            .period(self.download.period)
            .interval(Duration::from_secs(self.download.interval))
            .retries(self.http.retries)
            .timeout(self.http.timeout)
            .backoff(BackoffPolicy {
                base_delay: Duration::from_millis(self.backoff.base_delay),
                multiplier: self.backoff.multiplier,
                max_delay: Duration::from_millis(self.backoff.max_delay),
            })
            .build())
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_owned()
}

const fn default_tick_interval() -> u64 {
    DEFAULT_TICK_INTERVAL
}

const fn default_backoff_base_delay() -> u64 {
    DEFAULT_BACKOFF_BASE_DELAY
}

const fn default_backoff_multiplier() -> u32 {
    DEFAULT_BACKOFF_MULTIPLIER
}

const fn default_backoff_max_delay() -> u64 {
    DEFAULT_BACKOFF_MAX_DELAY
}

/// # Errors
///
/// - the config loader fails to build
/// - settings failed to load and deserialize into intermediate settings
/// - the intermediate settings fail to finalize into the final settings
pub fn load() -> Result<Settings, SettingsError> {
    let settings_loader = Config::builder()
        // Add in `./config.yml`
        .add_source(config::File::with_name("config.yml"))
        // Add in settings from the environment (with a prefix of I2L_SCRAPER)
        .add_source(config::Environment::with_prefix("I2L_SCRAPER"))
        .build()?;

    let intermediate_settings = settings_loader.try_deserialize::<IntermediateSettings>()?;

    // NOTE Not Debug-dumping the whole settings here;
    //      that would put the vendor token into the log.
    tracing::debug!(
        "Settings loaded: type '{}', dir '{}', period '{}'.",
        intermediate_settings.download.r#type,
        intermediate_settings.download.dir.display(),
        intermediate_settings.download.period,
    );

    intermediate_settings.finalize()
}
