// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Decides whether a recent enough dump already exists on disk,
//! so the periodic trigger can skip a download.
//!
//! Freshness is recomputed from the directory listing on every check;
//! there is no in-memory cache.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

use crate::dumps;
use crate::model::database_type::DatabaseType;
use crate::model::period::DownloadPeriod;

/// Returns whether `dir` contains a non-empty dump of `database_type`
/// from the current `period` bucket (hour/day/month, UTC).
#[must_use]
pub fn is_fresh(database_type: &DatabaseType, dir: &Path, period: DownloadPeriod) -> bool {
    is_fresh_at(database_type, dir, period, Utc::now())
}

/// Same as [`is_fresh`], with the "current" instant supplied by the caller.
#[must_use]
pub fn is_fresh_at(
    database_type: &DatabaseType,
    dir: &Path,
    period: DownloadPeriod,
    now: DateTime<Utc>,
) -> bool {
    let prefix = dumps::file_name_prefix(database_type, period, now);
    tracing::trace!(
        "Checking '{}' for dumps matching '{prefix}*{}' ...",
        dir.display(),
        dumps::FILE_NAME_EXTENSION
    );
    let Ok(entries) = fs::read_dir(dir) else {
        // An unlistable dir simply means no dump was fetched into it yet.
        tracing::trace!("Failed to list '{}'; considering it stale.", dir.display());
        return false;
    };
    entries
        .filter_map(Result::ok)
        .filter(|entry| {
            entry.file_name().to_str().is_some_and(|file_name| {
                file_name.starts_with(&prefix) && file_name.ends_with(dumps::FILE_NAME_EXTENSION)
            })
        })
        .any(|entry| entry.metadata().is_ok_and(|meta| meta.len() > 0))
}
