//! The scripted demonstration run.
//!
//! From one instant it derives a stamp and then, in order: makes sure the
//! web root exists, uploads `<stamp>.txt` into it, creates
//! `<stamp>_test_dir` under it and uploads `<stamp>_file2.txt` into that.
//! The first failure stops the run; nothing already done is rolled back.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::path::{Account, HomeRelativePath, WEB_ROOT};
use crate::remote::{DirStatus, RemoteFs, DEFAULT_DIR_MODE};
use crate::scratch::WorkArea;

/// Content of both generated files.
pub const GREETING: &str = "hello world";

/// Names derived from the run's instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoNames {
    pub stamp: String,
    pub first_file: String,
    pub nested_dir: String,
    pub second_file: String,
}

impl DemoNames {
    /// The stamp is the instant in Unix milliseconds.
    pub fn at(instant: DateTime<Utc>) -> Self {
        let stamp = instant.timestamp_millis().to_string();
        Self {
            first_file: format!("{stamp}.txt"),
            nested_dir: format!("{stamp}_test_dir"),
            second_file: format!("{stamp}_file2.txt"),
            stamp,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DemoOptions {
    /// Delete the uploaded files and the nested directory afterwards.
    pub teardown: bool,
}

/// What a completed run left on (or removed from) the account.
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub names: DemoNames,
    pub web_root: DirStatus,
    pub nested_dir: HomeRelativePath,
    pub uploaded: Vec<HomeRelativePath>,
    pub torn_down: bool,
}

pub fn run_demo<F: RemoteFs>(
    fs: &F,
    account: &Account,
    instant: DateTime<Utc>,
    options: DemoOptions,
) -> Result<DemoReport> {
    let names = DemoNames::at(instant);
    let work = WorkArea::new()?;
    let web_root = account.web_root();
    tracing::info!(stamp = %names.stamp, "Starting demo run");

    let web_root_status = fs
        .create_directory(account.home(), WEB_ROOT, DEFAULT_DIR_MODE)
        .with_context(|| format!("Failed to ensure {} exists", web_root))?;

    let first_local = work.write_file(&names.first_file, GREETING.as_bytes())?;
    fs.upload_files(&web_root, &[first_local])
        .with_context(|| format!("Failed to upload {}", names.first_file))?;

    fs.create_directory(&account.absolute(&web_root), &names.nested_dir, DEFAULT_DIR_MODE)
        .with_context(|| format!("Failed to create directory {}", names.nested_dir))?;

    let nested = web_root.join(&names.nested_dir)?;
    let second_local = work.write_file(&names.second_file, GREETING.as_bytes())?;
    fs.upload_files(&nested, &[second_local])
        .with_context(|| format!("Failed to upload {}", names.second_file))?;

    let uploaded = vec![
        web_root.join(&names.first_file)?,
        nested.join(&names.second_file)?,
    ];

    if options.teardown {
        // Contents before the directory that holds them.
        for path in uploaded.iter().rev() {
            fs.delete_file(path)
                .with_context(|| format!("Failed to delete {}", path))?;
        }
        fs.delete_directory(&nested)
            .with_context(|| format!("Failed to delete directory {}", nested))?;
    }

    // Error paths leave removal to the work area's drop.
    let work_path = work.path().to_path_buf();
    if let Err(e) = work.close() {
        tracing::warn!("Failed to clean up work area {}: {}", work_path.display(), e);
    }

    tracing::info!(stamp = %names.stamp, "Demo run finished");
    Ok(DemoReport {
        names,
        web_root: web_root_status,
        nested_dir: nested,
        uploaded,
        torn_down: options.teardown,
    })
}
