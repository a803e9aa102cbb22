//! Remote path forms.
//!
//! The file-manager API takes two kinds of paths that must not be mixed:
//! directory creation wants an absolute parent (`/home/acct/public_html`)
//! plus a bare child name, while upload and delete take a path relative to
//! the account home (`public_html/x`). Each form gets its own type.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name of the publicly served directory inside the account home.
pub const WEB_ROOT: &str = "public_html";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathError {
    #[error("Path '{0}' must be absolute (start with '/')")]
    NotAbsolute(String),

    #[error("Path '{0}' must be relative to the account home (no leading '/')")]
    NotRelative(String),

    #[error("Path must not be empty")]
    Empty,

    #[error("'{0}' is not a single path component")]
    BadName(String),
}

/// A path anchored at the filesystem root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbsolutePath(String);

/// A path expressed relative to the account home.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HomeRelativePath(String);

impl AbsolutePath {
    pub fn new(path: impl Into<String>) -> Result<Self, PathError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(PathError::NotAbsolute(path));
        }
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(Self("/".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Append a single component.
    pub fn join(&self, name: &str) -> Result<Self, PathError> {
        check_name(name)?;
        if self.0 == "/" {
            Ok(Self(format!("/{name}")))
        } else {
            Ok(Self(format!("{}/{name}", self.0)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl HomeRelativePath {
    pub fn new(path: impl Into<String>) -> Result<Self, PathError> {
        let path = path.into();
        if path.starts_with('/') {
            return Err(PathError::NotRelative(path));
        }
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn join(&self, name: &str) -> Result<Self, PathError> {
        check_name(name)?;
        Ok(Self(format!("{}/{name}", self.0)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn check_name(name: &str) -> Result<(), PathError> {
    if name.is_empty() {
        return Err(PathError::Empty);
    }
    if name.contains('/') || name == "." || name == ".." {
        return Err(PathError::BadName(name.to_string()));
    }
    Ok(())
}

impl fmt::Display for AbsolutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for HomeRelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AbsolutePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for HomeRelativePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Anchors of a hosting account: its home directory and web root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    home: AbsolutePath,
}

impl Account {
    /// Home is `<home_base>/<username>`, e.g. `/home/acct`.
    pub fn new(home_base: &str, username: &str) -> Result<Self, PathError> {
        let home = AbsolutePath::new(home_base)?.join(username)?;
        Ok(Self { home })
    }

    pub fn home(&self) -> &AbsolutePath {
        &self.home
    }

    pub fn web_root(&self) -> HomeRelativePath {
        HomeRelativePath(WEB_ROOT.to_string())
    }

    /// Resolve a home-relative path to its absolute form.
    pub fn absolute(&self, path: &HomeRelativePath) -> AbsolutePath {
        AbsolutePath(format!("{}/{}", self.home.0, path.0))
    }
}
