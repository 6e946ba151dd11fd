use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use subclone::cli::{Cli, LOG_ENV};
use subclone::fs::RealFileSystem;
use subclone::{CloneSummary, ManifestWalker, Progress, open_manifest};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(&cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("subclone: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<CloneSummary> {
    let manifest = open_manifest(&cli.input_file).await?;
    let progress = Progress::new(io::stdout());
    let mut walker = ManifestWalker::new(&RealFileSystem, &cli.src, &cli.dest, progress);

    walker.run(manifest).await.with_context(|| {
        format!(
            "cloning {} into {}",
            cli.src.display(),
            cli.dest.display()
        )
    })
}
