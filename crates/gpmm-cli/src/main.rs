mod logging;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "gpmm",
    version,
    about = "Google Photos metadata merger - write Takeout sidecar capture times into media files"
)]
struct Cli {
    /// Set folder to scan files recursively
    #[arg(short, long)]
    folder: PathBuf,

    /// Show debug output on the console
    #[arg(short, long)]
    verbose: bool,

    /// Do not append to <folder>_merged/log.txt
    #[arg(long)]
    no_log_file: bool,

    /// Keep the copy time as mtime instead of the capture time
    #[arg(long)]
    keep_file_times: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Validates the folder before anything is written
    let roots = gpmm_core::OutputRoots::for_input(&cli.folder)?;
    let log_path = roots.log_path();
    logging::init_logging(logging::LogConfig {
        verbose: cli.verbose,
        log_file: (!cli.no_log_file).then_some(log_path.as_path()),
    })?;
    if !cli.no_log_file {
        tracing::debug!(log = %log_path.display(), "appending run log");
    }

    let options = gpmm_core::MergeOptions {
        folder: roots.input.clone(),
        set_file_times: !cli.keep_file_times,
    };

    let result = gpmm_core::run(&options)?;

    eprintln!(
        "Done! {} merged, {} moved to {}, {} without sidecar, {} already processed, {} without usable timestamp",
        result.merged,
        result.quarantined,
        roots.bad.display(),
        result.skipped_no_sidecar,
        result.skipped_already_processed,
        result.skipped_unparseable_timestamp,
    );

    Ok(())
}
