use anyhow::{Context, Result};
use gitglance::{Config, Inspector, Report, logging};
use tracing::info;

fn main() -> Result<()> {
    let config = Config::parse();
    logging::init(config.verbose);
    config.validate()?;

    let inspector = Inspector::open(&config.repo)
        .with_context(|| format!("Failed to open repository at {}", config.repo.display()))?;

    let report = Report::collect(&inspector, config.max_count)
        .with_context(|| format!("Failed to inspect {}", inspector.path().display()))?;

    info!(commits = report.commit_count(), range = %report.range(), "inspection complete");
    print!("{report}");

    Ok(())
}
