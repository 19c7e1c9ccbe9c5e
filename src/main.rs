use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vessel_crossref::extract_with;
use vessel_crossref::infrastructure::config;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vessel_crossref=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env().with_args(std::env::args().skip(1));

    tracing::info!(
        "Cross-referencing {} with {}",
        config.registry_path.display(),
        config.document_path.display()
    );

    let extraction = match extract_with(
        &config.registry_path,
        &config.document_path,
        &config.extract_options(),
    ) {
        Ok(extraction) => extraction,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut records: Vec<_> = extraction.records.into_iter().collect();
    records.sort();

    for record in &records {
        match serde_json::to_string(record) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                tracing::error!("Failed to serialize record {}: {}", record.imo, e);
                return ExitCode::FAILURE;
            }
        }
    }

    tracing::info!(
        "{} vessels written ({} concepts skipped)",
        records.len(),
        extraction.stats.skipped()
    );
    ExitCode::SUCCESS
}
