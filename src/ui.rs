// UI layer: wraps any `RemoteFs` so every remote call shows an indicatif
// spinner while it runs and a one-line result when it finishes.

use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::FmError;
use crate::path::{AbsolutePath, HomeRelativePath};
use crate::remote::{Accepted, DirStatus, RemoteFs};

/// `RemoteFs` decorator that reports progress on the terminal.
pub struct Spinning<F> {
    inner: F,
}

impl<F: RemoteFs> Spinning<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }

    fn step<T, D: Display>(
        &self,
        message: D,
        call: impl FnOnce(&F) -> Result<T, FmError>,
        done: impl FnOnce(&T) -> String,
    ) -> Result<T, FmError> {
        let spinner = ProgressBar::new_spinner();
        // The template is static; fall back to the default look if it is rejected.
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = call(&self.inner);
        match &result {
            Ok(value) => spinner.finish_with_message(format!("✔ {}", done(value))),
            Err(e) => spinner.abandon_with_message(format!("✘ {message}: {e}")),
        }
        result
    }
}

impl<F: RemoteFs> RemoteFs for Spinning<F> {
    fn create_directory(
        &self,
        parent: &AbsolutePath,
        name: &str,
        permissions: &str,
    ) -> Result<DirStatus, FmError> {
        self.step(
            format!("Creating directory {parent}/{name}"),
            |fs| fs.create_directory(parent, name, permissions),
            |status: &DirStatus| match status {
                DirStatus::Created => format!("Created {parent}/{name}"),
                DirStatus::AlreadyExists => format!("{parent}/{name} already exists"),
            },
        )
    }

    fn upload_files(&self, dir: &HomeRelativePath, files: &[PathBuf]) -> Result<Accepted, FmError> {
        let names: Vec<String> = files
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        self.step(
            format!("Uploading {} to {dir}", names.join(", ")),
            |fs| fs.upload_files(dir, files),
            |_| format!("Uploaded {} to {dir}", names.join(", ")),
        )
    }

    fn delete_file(&self, path: &HomeRelativePath) -> Result<Accepted, FmError> {
        self.step(
            format!("Deleting {path}"),
            |fs| fs.delete_file(path),
            |_| format!("Deleted {path}"),
        )
    }

    fn delete_directory(&self, path: &HomeRelativePath) -> Result<Accepted, FmError> {
        self.step(
            format!("Removing directory {path}"),
            |fs| fs.delete_directory(path),
            |_| format!("Removal of {path} accepted"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Refusing;

    impl RemoteFs for Refusing {
        fn create_directory(&self, _: &AbsolutePath, _: &str, _: &str) -> Result<DirStatus, FmError> {
            Ok(DirStatus::AlreadyExists)
        }

        fn upload_files(&self, _: &HomeRelativePath, _: &[PathBuf]) -> Result<Accepted, FmError> {
            Err(FmError::Transport {
                message: "connection refused".into(),
            })
        }

        fn delete_file(&self, _: &HomeRelativePath) -> Result<Accepted, FmError> {
            Ok(Accepted)
        }

        fn delete_directory(&self, _: &HomeRelativePath) -> Result<Accepted, FmError> {
            Ok(Accepted)
        }
    }

    #[test]
    fn results_pass_through_unchanged() {
        let fs = Spinning::new(Refusing);
        let parent = AbsolutePath::new("/home/acct").unwrap();
        let dir = HomeRelativePath::new("public_html").unwrap();

        assert_eq!(
            fs.create_directory(&parent, "public_html", "0755").unwrap(),
            DirStatus::AlreadyExists
        );
        let err = fs.upload_files(&dir, &[PathBuf::from("a.txt")]).unwrap_err();
        assert!(matches!(err, FmError::Transport { .. }));
        assert_eq!(fs.delete_file(&dir.join("a.txt").unwrap()).unwrap(), Accepted);
    }
}
