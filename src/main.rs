use dailystats_lib::config::StatsConfig;
use dailystats_lib::error::SyncError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        log::error!("Daily stats sync failed: {}", e);
        eprintln!("dailystats: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run() -> Result<(), SyncError> {
    let config = StatsConfig::from_env()?;
    let today = chrono::Local::now().date_naive();

    let report = dailystats_lib::run(&config, today).await?;
    if report.inserted {
        log::info!("Recorded {} for {}", report.status.status, report.date);
    } else {
        log::info!(
            "{} for {} was already recorded, nothing to do",
            report.status.status,
            report.date
        );
    }
    Ok(())
}
