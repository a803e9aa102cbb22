use std::path::PathBuf;

use crate::error::FmError;
use crate::path::{AbsolutePath, HomeRelativePath};

/// Permission mode used when the caller does not pass one.
pub const DEFAULT_DIR_MODE: &str = "0755";

/// How a directory creation succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Created,
    AlreadyExists,
}

/// The server accepted the request. For directory deletion this does not
/// mean the directory is gone: a non-empty directory is left in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted;

/// Filesystem-shaped operations on a remote hosting account.
///
/// Every call is a single stateless exchange. Ordering (create before
/// upload, delete contents before the directory) is up to the caller.
pub trait RemoteFs {
    /// Create `name` under the absolute `parent`. Succeeds when the
    /// directory already exists.
    fn create_directory(
        &self,
        parent: &AbsolutePath,
        name: &str,
        permissions: &str,
    ) -> Result<DirStatus, FmError>;

    /// Upload `files` into `dir`, in order, as `file-1..file-N`.
    fn upload_files(&self, dir: &HomeRelativePath, files: &[PathBuf]) -> Result<Accepted, FmError>;

    fn delete_file(&self, path: &HomeRelativePath) -> Result<Accepted, FmError>;

    fn delete_directory(&self, path: &HomeRelativePath) -> Result<Accepted, FmError>;
}
