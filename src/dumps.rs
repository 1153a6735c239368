// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The on-disk naming convention for downloaded dumps.
//!
//! All dumps live flat in one directory, named
//! `IP2LOCATION_<TYPE>_<yyyyMMdd-HHmmss.SSSS>.zip` (timestamp in UTC).
//! The sub-second part makes names of newly created files unique;
//! truncating the timestamp to a period granularity
//! yields the prefix that the freshness check matches against.

use chrono::{DateTime, Utc};

use crate::model::database_type::DatabaseType;
use crate::model::period::DownloadPeriod;

pub const FILE_NAME_PREFIX: &str = "IP2LOCATION_";
pub const FILE_NAME_EXTENSION: &str = ".zip";
const FILE_NAME_DATE_PATTERN: &str = "%Y%m%d-%H%M%S";

/// Formats `at` the way it appears in a full dump file name,
/// with a four digit sub-second field.
fn timestamp(at: DateTime<Utc>) -> String {
    format!(
        "{}.{:04}",
        at.format(FILE_NAME_DATE_PATTERN),
        at.timestamp_subsec_micros() / 100
    )
}

/// The full name for a dump file created at `at`,
/// e.g. `IP2LOCATION_DB1_20240115-093000.0001.zip`.
#[must_use]
pub fn file_name(database_type: &DatabaseType, at: DateTime<Utc>) -> String {
    format!(
        "{FILE_NAME_PREFIX}{database_type}_{}{FILE_NAME_EXTENSION}",
        timestamp(at)
    )
}

/// The name prefix shared by all dump files of `database_type`
/// whose timestamp falls into the same `period` bucket as `at`.
#[must_use]
pub fn file_name_prefix(
    database_type: &DatabaseType,
    period: DownloadPeriod,
    at: DateTime<Utc>,
) -> String {
    format!(
        "{FILE_NAME_PREFIX}{database_type}_{}",
        at.format(period.timestamp_pattern())
    )
}
