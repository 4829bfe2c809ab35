//! snapsort - date-partitioned photo and video reorganization tool

use anyhow::Result;
use clap::Parser;
use snapsort::{Cli, DupeFileOption, Error, ImageSorter, SortOptions};
use std::path::Path;
use tracing::{Level, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = setup_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "snapsort starting");

    if let Some(ref path) = cli.write_sample_options {
        std::fs::write(path, SortOptions::sample_options())?;
        info!(path = %path.display(), "Wrote sample options file");
        return Ok(());
    }

    let options = load_options(&cli)?;
    if cli.verbose {
        info!(?options, "Options resolved");
    }

    if cli.output.starts_with(&cli.input) {
        anyhow::bail!(
            "output directory {} is inside input directory {}",
            cli.output.display(),
            cli.input.display()
        );
    }

    let mut sorter = ImageSorter::new(cli.input.clone(), cli.output.clone(), options)
        .with_progress(|p| info!(completed = p.completed, total = p.total, "progress"));

    let duplicates = match sorter.run() {
        Ok(duplicates) => duplicates,
        Err(e) => {
            error!(error = %e, "Run failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if !duplicates.is_empty() {
        match cli.on_duplicate {
            Some(policy) => resolve_duplicates(&mut sorter, policy)?,
            None => {
                warn!(count = duplicates.len(), "Pending name collisions");
                eprintln!("{} name collision(s) were deferred:", duplicates.len());
                for record in &duplicates {
                    eprintln!(
                        "  {} -> {}",
                        record.source.display(),
                        record.destination.display()
                    );
                }
                eprintln!("Re-run with --on-duplicate <keep-both|skip|replace> to resolve them.");
                std::process::exit(2);
            }
        }
    }

    let (completed, total) = sorter.progress();
    info!(
        completed,
        total,
        skipped_without_date = sorter.skipped_without_date(),
        "Run complete"
    );

    Ok(())
}

/// Bulk-resolve every pending duplicate with one policy
fn resolve_duplicates(sorter: &mut ImageSorter, policy: DupeFileOption) -> Result<()> {
    info!(count = sorter.duplicate_count(), ?policy, "Resolving duplicates");
    match sorter.resolve_all_duplicates(policy) {
        Ok(()) => Ok(()),
        Err(e @ Error::Trash { .. }) => {
            error!(error = %e, pending = sorter.duplicate_count(), "Duplicate resolution aborted");
            eprintln!("Error: {}", e);
            eprintln!("{} duplicate(s) remain unresolved.", sorter.duplicate_count());
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

/// Load options from a file when given, with CLI flags taking precedence
fn load_options(cli: &Cli) -> Result<SortOptions> {
    let options = if let Some(ref path) = cli.options_file {
        info!(options_file = %path.display(), "Loading options from file");
        let file_options = SortOptions::load_from_file(path)?;
        cli.merge_with_options(file_options)
    } else {
        cli.to_options()
    };
    Ok(options)
}

/// Setup logging: stderr always, plus an optional non-blocking file layer
fn setup_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if let Some(ref log_path) = cli.log_file {
        if let Some(parent) = log_path.parent()
            && parent != Path::new("")
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file);

        if cli.json_log {
            subscriber
                .with(fmt::layer().json().with_ansi(false).with_writer(non_blocking))
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        } else {
            subscriber
                .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }

        Ok(Some(guard))
    } else {
        subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        Ok(None)
    }
}
