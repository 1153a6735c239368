// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use strum::EnumIter;

/// The time bucket used to decide whether an already downloaded dump
/// is recent enough to skip fetching a new one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum DownloadPeriod {
    Hour,
    Day,
    Month,
}

impl DownloadPeriod {
    /// The [`chrono::format::strftime`] pattern that turns a UTC instant
    /// into the file-name timestamp prefix of this bucket.
    ///
    /// The trailing `-` in the Day pattern is part of the contract:
    /// it separates the day from whatever follows in the file name,
    /// so a day prefix can never match an entry of a later timestamp
    /// that merely continues with more digits.
    #[must_use]
    pub const fn timestamp_pattern(self) -> &'static str {
        match self {
            Self::Hour => "%Y%m%d-%H",
            Self::Day => "%Y%m%d-",
            Self::Month => "%Y%m",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Month => "month",
        }
    }
}

impl AsRef<str> for DownloadPeriod {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for DownloadPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
