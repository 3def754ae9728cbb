//! Cabal package identifiers and package database references.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::decode::{DecodeError, DecodeResult};

/// Splits `name-1.2.3` into name and version; the version suffix is the last
/// `-` followed by dot-separated digit groups.
static PACKAGE_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.*?)(?:-(?P<version>\d+(?:\.\d+)*))?$").expect("package regex")
});

/// Cabal package, optionally pinned to a version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Package {
    pub name: String,
    pub version: Option<String>,
}

impl Package {
    #[must_use]
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// `name` or `name-version`, the form used in package listings.
    #[must_use]
    pub fn package_id(&self) -> String {
        match &self.version {
            Some(version) => format!("{}-{version}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn parse(value: &Value) -> DecodeResult<Self> {
        let Some(raw) = value.as_str() else {
            return Err(DecodeError::new(format!(
                "package should be a string, got: {value}"
            )));
        };
        let captures = PACKAGE_RX.captures(raw).ok_or_else(|| {
            DecodeError::new(format!(
                "unable to parse package (should be in form <name>-<ver>): {raw}"
            ))
        })?;
        Ok(Self {
            name: captures["name"].to_owned(),
            version: captures.name("version").map(|m| m.as_str().to_owned()),
        })
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.package_id())
    }
}

/// A GHC package database in hsdev's string form: `global-db`, `user-db` or
/// `package-db:<path>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PackageDb {
    Global,
    User,
    Custom { path: String },
}

impl PackageDb {
    pub fn parse(value: &Value) -> DecodeResult<Self> {
        let Some(raw) = value.as_str() else {
            return Err(DecodeError::new(format!(
                "package-db should be a string, got: {value}"
            )));
        };
        Self::parse_str(raw)
    }

    pub fn parse_str(raw: &str) -> DecodeResult<Self> {
        match raw {
            "global-db" => Ok(Self::Global),
            "user-db" => Ok(Self::User),
            _ => raw
                .strip_prefix("package-db:")
                .filter(|path| !path.is_empty())
                .map(|path| Self::Custom {
                    path: path.to_owned(),
                })
                .ok_or_else(|| DecodeError::new(format!("unable to parse package-db: {raw}"))),
        }
    }
}

impl fmt::Display for PackageDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global-db"),
            Self::User => write!(f, "user-db"),
            Self::Custom { path } => write!(f, "package-db:{path}"),
        }
    }
}
