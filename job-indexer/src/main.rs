use std::error::Error;

use clap::Parser;
use tracing::error;

use job_indexer::logging::{self, LogFormat};
use job_indexer::{Cli, IndexerSettings, IndexingError};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    logging::init(LogFormat::from_env());

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %e, "Indexing failed");
        eprintln!("\nError: {}", e);

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  Caused by: {}", err);
            source = err.source();
        }

        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), IndexingError> {
    let settings = IndexerSettings::from_env(cli)?;
    job_indexer::run(settings).await?;
    Ok(())
}
