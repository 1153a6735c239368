// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Orchestrates a single dump download:
//! validates the requested database type,
//! prepares the destination directory,
//! invokes the [`Transfer`] capability
//! and validates what arrived on disk.

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::dumps;
use crate::model::database_type::{self, DatabaseType};
use crate::transfer::{self, Transfer};

/// The vendors download endpoint.
/// Token and file type are passed as query parameters,
/// in exactly this form; this is a fixed wire contract.
pub const DOWNLOAD_API_URL: &str = "https://www.ip2location.com/download";

/// Thrown when a download could not be performed,
/// or performed but did not produce a usable dump.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    InvalidDatabaseType(#[from] database_type::ParseError),
    #[error("Given dir '{}' is not a directory.", .0.display())]
    NotADirectory(PathBuf),
    #[error("Given dir '{}' is not writable.", .0.display())]
    NotWritable(PathBuf),
    #[error("Could not create dir '{}'.", .0.display())]
    CouldNotCreateDir(PathBuf, #[source] std::io::Error),
    #[error("Could not delete file '{}'.", .0.display())]
    CouldNotDeleteFile(PathBuf, #[source] std::io::Error),
    #[error("Not a valid download URL: '{0}'")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Transfer(#[from] transfer::Error),
    #[error("Downloaded dump is empty.")]
    EmptyDump,
}

impl Error {
    /// Whether a later re-attempt of the same download may succeed.
    /// Everything else points at a configuration problem
    /// that no amount of retrying will fix.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transfer(_) | Self::EmptyDump => true,
            Self::InvalidDatabaseType(_)
            | Self::NotADirectory(_)
            | Self::NotWritable(_)
            | Self::CouldNotCreateDir(_, _)
            | Self::CouldNotDeleteFile(_, _)
            | Self::InvalidUrl(_) => false,
        }
    }
}

/// Downloads the latest dump of a database type
/// from the IP2Location API into a local directory.
///
/// Holds the vendor token;
/// the actual byte transfer is delegated to the injected [`Transfer`].
pub struct Downloader {
    token: String,
    transfer: Box<dyn Transfer>,
}

impl Downloader {
    #[must_use]
    pub fn new(token: String, transfer: Box<dyn Transfer>) -> Self {
        Self { token, transfer }
    }

    fn dump_url(&self, database_type: &DatabaseType) -> Result<Url, Error> {
        Ok(Url::parse(&format!(
            "{DOWNLOAD_API_URL}?token={}&file={database_type}",
            self.token
        ))?)
    }

    /// Downloads the latest dump of `database_type` into `dir` and returns
    /// the path of the downloaded file.
    ///
    /// The file is named `IP2LOCATION_<TYPE>_<yyyyMMdd-HHmmss.SSSS>.zip`
    /// (see [`dumps::file_name`]);
    /// `dir` is created (with parents) if it does not exist yet.
    ///
    /// No retrying happens in here;
    /// a failed download is simply re-attempted
    /// whenever the trigger fires next.
    pub async fn download(&self, database_type: &str, dir: &Path) -> Result<PathBuf, Error> {
        let database_type = DatabaseType::from_str(database_type)?;

        match fs::metadata(dir) {
            Ok(meta) if !meta.is_dir() => {
                return Err(Error::NotADirectory(dir.to_path_buf()));
            }
            Ok(meta) if meta.permissions().readonly() => {
                return Err(Error::NotWritable(dir.to_path_buf()));
            }
            Ok(_) => (),
            Err(_) => {
                fs::create_dir_all(dir)
                    .map_err(|err| Error::CouldNotCreateDir(dir.to_path_buf(), err))?;
            }
        }

        let destination = dir.join(dumps::file_name(&database_type, Utc::now()));
        // Practically impossible to hit thanks to the sub-second timestamp,
        // but a leftover at the destination must not survive.
        if destination.exists() {
            fs::remove_file(&destination)
                .map_err(|err| Error::CouldNotDeleteFile(destination.clone(), err))?;
        }

        tracing::info!(
            "Downloading IP2Location '{database_type}' to '{}'.",
            destination.display()
        );
        let dump_url = self.dump_url(&database_type)?;
        self.transfer.fetch(&dump_url, &destination).await?;

        let non_empty = fs::metadata(&destination).is_ok_and(|meta| meta.len() > 0);
        if !non_empty {
            return Err(Error::EmptyDump);
        }

        Ok(destination)
    }
}
