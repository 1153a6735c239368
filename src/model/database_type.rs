// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use regex::Regex;
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// All valid database type identifiers look like "DB24" or "PX11":
/// a product prefix followed by one or two digits.
static VALID_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^(DB|PX)[0-9]{1,2}$").expect("Hard-coded regex is known to be valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid database type requested: '{0}'.")]
pub struct ParseError(pub String);

/// Identifier of one of the vendors database products,
/// e.g. "DB1" (IP-to-country) or "PX11" (proxy data).
/// Values of this type are always syntactically valid;
/// the only way to construct one is [`Self::from_str`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DatabaseType(String);

impl DatabaseType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DatabaseType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if VALID_TYPE.is_match(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(ParseError(s.to_owned()))
        }
    }
}

impl AsRef<str> for DatabaseType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
