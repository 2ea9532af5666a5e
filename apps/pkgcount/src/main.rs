use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::{debug, info, warn};
use pkgcount_core::CancellationToken;
use pkgcount_import_counts::Config;
use std::{
    fs::File,
    io::{BufWriter, Write},
    time::Instant,
};

#[derive(Parser)]
#[command(name = "pkgcount")]
#[command(about = "Count internal and external package imports in a Go codebase", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let cfg = cli.config;
    debug!("Parsed CLI arguments: {:?}", cfg);

    if let Some(threads) = cfg.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure worker threads")?;
    }

    let token = CancellationToken::new();
    let interrupt = token.clone();
    // SIGINT, SIGTERM and SIGHUP all cancel the run
    ctrlc::set_handler(move || {
        warn!("Received termination signal, cancelling run");
        interrupt.cancel();
    })
    .context("failed to install signal handler")?;

    let start = Instant::now();
    let num_threads = rayon::current_num_threads();
    info!("Counting packages in {} (using {} threads)", cfg.dir.display(), num_threads);

    let result =
        pkgcount_import_counts::run_package_count(&cfg, &token).context("failed to run pkgcount")?;

    match &cfg.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            let mut out = BufWriter::new(file);
            pkgcount_import_counts::write_report(&mut out, &result.report, cfg.output_format())
                .context("failed to write output to file")?;
        }
        None => {
            // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
            // See https://github.com/rust-lang/rust/issues/60673
            let mut stdout = BufWriter::new(std::io::stdout());
            pkgcount_import_counts::write_report(&mut stdout, &result.report, cfg.output_format())
                .context("failed to write output to stdout")?;
            stdout.flush()?;
        }
    }

    let elapsed_ms = start.elapsed().as_millis();
    info!(
        "{} Finished in {}ms on {} files (using {} threads).",
        "●".bright_blue(),
        elapsed_ms.to_string().cyan(),
        result.files_analyzed.to_string().cyan(),
        num_threads.to_string().cyan()
    );

    Ok(())
}
