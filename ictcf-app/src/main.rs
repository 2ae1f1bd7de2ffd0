use anyhow::Result;
use clap::Parser;
use cli::Cli;
use ictcf_common::observability::{LogConfig, LogFormat, init_logging};
use ictcf_config::{IctcfConfig, IctcfConfigLoader};
use tracing::info;
mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins over file, flags win over both)
    let mut cfg: IctcfConfig = IctcfConfigLoader::new()
        .with_optional_file(&cli.config)
        .load()?;
    cli.apply(&mut cfg);

    if cli.print_config {
        print!("{}", serde_yaml::to_string(&cfg)?);
        return Ok(());
    }

    init_logging(LogConfig {
        format: if cli.log_json {
            LogFormat::Json
        } else {
            LogFormat::Text
        },
        ..LogConfig::default()
    })?;

    let summary = ictcf_scraper::scrape(&cfg).await?;
    info!(
        target: "ictcf.run",
        pages = summary.pages,
        patients = summary.patients,
        details = summary.details,
        "run complete"
    );
    println!("File exported to {}", summary.export_path.display());
    Ok(())
}
