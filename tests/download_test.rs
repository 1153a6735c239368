// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use async_trait::async_trait;
use regex::Regex;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use url::Url;

use i2l_scraper::download::{Downloader, Error};
use i2l_scraper::transfer::{self, Transfer};

type FetchLog = Rc<RefCell<Vec<(Url, PathBuf)>>>;

/// Stands in for the HTTP transfer:
/// records what it was asked to fetch,
/// and either writes a canned body, writes nothing, or fails.
struct MockTransfer {
    body: Option<Vec<u8>>,
    fail: bool,
    fetched: FetchLog,
}

fn mock(body: Option<&[u8]>, fail: bool) -> (Box<dyn Transfer>, FetchLog) {
    let fetched = FetchLog::default();
    (
        Box::new(MockTransfer {
            body: body.map(<[u8]>::to_vec),
            fail,
            fetched: Rc::clone(&fetched),
        }),
        fetched,
    )
}

#[async_trait(?Send)]
impl Transfer for MockTransfer {
    async fn fetch(&self, source: &Url, destination: &Path) -> Result<(), transfer::Error> {
        self.fetched
            .borrow_mut()
            .push((source.clone(), destination.to_path_buf()));
        if self.fail {
            return Err(transfer::Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }
        if let Some(body) = &self.body {
            fs::write(destination, body)?;
        }
        Ok(())
    }
}

#[tokio::test]
async fn downloads_the_dump_and_returns_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let (transfer, fetched) = mock(Some(b"dummy file content"), false);
    let downloader = Downloader::new("1234".to_owned(), transfer);

    let result = downloader.download("DB1", dir.path()).await.unwrap();

    let file_name = result.file_name().unwrap().to_str().unwrap();
    let name_pattern = Regex::new(r"^IP2LOCATION_DB1_\d{8}-\d{6}\.\d{4}\.zip$").unwrap();
    assert!(name_pattern.is_match(file_name), "{file_name}");
    assert_eq!(result.parent().unwrap(), dir.path());
    assert_eq!(fs::read(&result).unwrap(), b"dummy file content");

    let log = fetched.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(
        log[0].0.as_str(),
        "https://www.ip2location.com/download?token=1234&file=DB1"
    );
    assert_eq!(log[0].1, result);
}

#[tokio::test]
async fn fails_when_the_transfer_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let (transfer, _fetched) = mock(None, false);
    let downloader = Downloader::new("1234".to_owned(), transfer);

    let err = downloader.download("DB1", dir.path()).await.unwrap_err();

    assert!(matches!(err, Error::EmptyDump));
    assert_eq!(err.to_string(), "Downloaded dump is empty.");
    assert!(err.is_transient());
}

#[tokio::test]
async fn fails_when_the_transfer_delivers_zero_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let (transfer, _fetched) = mock(Some(b""), false);
    let downloader = Downloader::new("1234".to_owned(), transfer);

    let err = downloader.download("DB1", dir.path()).await.unwrap_err();

    assert!(matches!(err, Error::EmptyDump));
    assert_eq!(err.to_string(), "Downloaded dump is empty.");
}

#[tokio::test]
async fn rejects_an_invalid_database_type_before_any_io() {
    let dir = tempfile::tempdir().unwrap();
    let untouched = dir.path().join("untouched");
    let (transfer, fetched) = mock(Some(b"dummy file content"), false);
    let downloader = Downloader::new("1234".to_owned(), transfer);

    let err = downloader.download("DB 1", &untouched).await.unwrap_err();

    assert!(matches!(err, Error::InvalidDatabaseType(_)));
    assert_eq!(err.to_string(), "Invalid database type requested: 'DB 1'.");
    assert!(!err.is_transient());
    // Neither the transfer nor the filesystem were touched.
    assert!(fetched.borrow().is_empty());
    assert!(!untouched.exists());
}

#[tokio::test]
async fn rejects_a_destination_that_is_no_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("i2l-test");
    fs::write(&file, "content").unwrap();
    let (transfer, fetched) = mock(Some(b"dummy file content"), false);
    let downloader = Downloader::new("1234".to_owned(), transfer);

    let err = downloader.download("DB1", &file).await.unwrap_err();

    assert!(matches!(err, Error::NotADirectory(_)));
    assert!(err.to_string().contains("is not a directory"), "{err}");
    assert!(!err.is_transient());
    assert!(fetched.borrow().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn rejects_an_unwritable_destination() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let unwritable = dir.path().join("i2l-test");
    fs::create_dir(&unwritable).unwrap();
    fs::set_permissions(&unwritable, fs::Permissions::from_mode(0o555)).unwrap();
    let (transfer, fetched) = mock(Some(b"dummy file content"), false);
    let downloader = Downloader::new("1234".to_owned(), transfer);

    let err = downloader.download("DB1", &unwritable).await.unwrap_err();

    fs::set_permissions(&unwritable, fs::Permissions::from_mode(0o755)).unwrap();
    assert!(matches!(err, Error::NotWritable(_)));
    assert!(err.to_string().contains("is not writable"), "{err}");
    assert!(fetched.borrow().is_empty());
}

#[tokio::test]
async fn creates_a_missing_destination_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("i2l").join("dumps");
    let (transfer, _fetched) = mock(Some(b"dummy file content"), false);
    let downloader = Downloader::new("1234".to_owned(), transfer);

    let result = downloader.download("PX11", &nested).await.unwrap();

    assert!(nested.is_dir());
    assert!(result.starts_with(&nested));
    assert!(result
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("IP2LOCATION_PX11_"));
}

#[tokio::test]
async fn propagates_transfer_failures_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let (transfer, _fetched) = mock(None, true);
    let downloader = Downloader::new("1234".to_owned(), transfer);

    let err = downloader.download("DB1", dir.path()).await.unwrap_err();

    assert!(matches!(err, Error::Transfer(_)));
    assert!(err.is_transient());
    assert!(err.to_string().contains("connection reset by peer"), "{err}");
}
