// Entrypoint for the CLI application.
// - Keeps `main` small: load settings, build the API client and run the
//   chosen command.
// - Any error ends the process with a non-zero exit code.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use panel_fm::config::Settings;
use panel_fm::demo::{run_demo, DemoOptions};
use panel_fm::path::{AbsolutePath, HomeRelativePath};
use panel_fm::remote::{RemoteFs, DEFAULT_DIR_MODE};
use panel_fm::ui::Spinning;
use panel_fm::{logging, FileManagerClient};

#[derive(Parser)]
#[command(name = "panel-fm", version, about = "Hosting control-panel file manager client")]
struct Cli {
    /// Path to a JSON settings file (environment variables override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Create a timestamped file, directory and nested file in the web root
    Demo {
        /// Delete what was uploaded once the run succeeds
        #[arg(long)]
        teardown: bool,
    },
    /// Create NAME under the absolute PARENT directory
    Mkdir {
        parent: AbsolutePath,
        name: String,
        #[arg(long, default_value = DEFAULT_DIR_MODE)]
        mode: String,
    },
    /// Upload local files into a directory relative to the account home
    Upload {
        dir: HomeRelativePath,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Delete a file (path relative to the account home)
    Rm { path: HomeRelativePath },
    /// Delete a directory (path relative to the account home)
    Rmdir { path: HomeRelativePath },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Settings are resolved before any network activity.
    let settings = Settings::load(cli.config.as_deref()).context("Invalid configuration")?;
    let client = FileManagerClient::new(&settings.credentials, settings.timeout)?;
    let fs = Spinning::new(client);

    match cli.command.unwrap_or(Command::Demo { teardown: false }) {
        Command::Demo { teardown } => {
            let report = run_demo(&fs, &settings.account, chrono::Utc::now(), DemoOptions { teardown })?;
            for path in &report.uploaded {
                println!("{}", path);
            }
            println!("{}/", report.nested_dir);
        }
        Command::Mkdir { parent, name, mode } => {
            fs.create_directory(&parent, &name, &mode)?;
        }
        Command::Upload { dir, files } => {
            fs.upload_files(&dir, &files)?;
        }
        Command::Rm { path } => {
            fs.delete_file(&path)?;
        }
        Command::Rmdir { path } => {
            fs.delete_directory(&path)?;
        }
    }
    Ok(())
}
