// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The byte-transfer capability of the downloader:
//! "fetch the content behind a URL into a local file".
//!
//! The orchestrator only sees the [`Transfer`] trait;
//! [`HttpTransfer`] is the production implementation.

use async_std::fs::{self, File};
use async_std::path;
use async_trait::async_trait;
use futures::{AsyncWriteExt, StreamExt};
use reqwest::{
    header::{self, HeaderMap},
    Client,
};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_TIMEOUT: u64 = 10000;

/// Thrown when a [`Transfer`] failed to bring the remote content
/// fully onto the local disk.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Network/Internet download failed: '{0}'")]
    Download(#[from] reqwest::Error),
    #[error("Network/Internet download failed: '{0}'")]
    DownloadMiddleware(#[from] reqwest_middleware::Error),
    #[error("Some I/O problem: '{0}'")]
    Io(#[from] std::io::Error),
}

/// Streams the bytes behind `source` into the file at `destination`,
/// creating or overwriting it.
///
/// An implementation must not report success
/// while leaving a partially written file behind.
#[async_trait(?Send)]
pub trait Transfer {
    async fn fetch(&self, source: &Url, destination: &Path) -> Result<(), Error>;
}

/// Creates a default set of headers for downloads.
fn create_headers(user_agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, user_agent.parse().unwrap());
    headers
}

/// Creates a new [`reqwest::Client`] with the supplied retry and timeout settings.
/// @param retries Number of retries for a single fetch
/// @param timeout Total timeout per request in milliseconds (ms)
fn create_downloader(user_agent: &str, retries: u32, timeout: u64) -> ClientWithMiddleware {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(retries);
    let client_builder = Client::builder()
        .timeout(Duration::from_millis(timeout))
        .default_headers(create_headers(user_agent));
    ClientBuilder::new(client_builder.build().unwrap())
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
}

fn temp_path(destination: &Path) -> path::PathBuf {
    let mut raw = destination.as_os_str().to_owned();
    raw.push(".temp");
    path::PathBuf::from(raw)
}

/// The production [`Transfer`]: a plain HTTP(S) GET.
pub struct HttpTransfer {
    client: Arc<ClientWithMiddleware>,
}

impl HttpTransfer {
    #[must_use]
    pub fn new(user_agent: &str, retries: u32, timeout: u64) -> Self {
        Self {
            client: Arc::new(create_downloader(user_agent, retries, timeout)),
        }
    }
}

#[async_trait(?Send)]
impl Transfer for HttpTransfer {
    async fn fetch(&self, source: &Url, destination: &Path) -> Result<(), Error> {
        let response = self
            .client
            .get(source.clone())
            .send()
            .await?
            .error_for_status()?;

        // First stream into a sibling temp file,
        // then move it into place in one step.
        let temp_file_path = temp_path(destination);
        let mut out = File::create(&temp_file_path).await?;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            out.write_all(&chunk?).await?;
        }
        out.flush().await?;
        fs::rename(temp_file_path, path::PathBuf::from(destination.to_path_buf())).await?;

        Ok(())
    }
}
