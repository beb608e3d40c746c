mod bootstrap;

use anyhow::Result;
use rps_core::error::RpsError;
use rps_core::settings::{LogSource, RunMode, Settings};
use rps_data::analysis::analyze_log;
use rps_data::filter::DateRange;
use rps_data::reader::open_log_file;
use rps_runtime::follow::FollowEngine;
use rps_ui::report::Reporter;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level);

    tracing::info!("rps-monitor v{} starting", env!("CARGO_PKG_VERSION"));

    let mode = settings.run_mode()?;
    let range = DateRange::from_bounds(settings.fromdate.as_deref(), settings.todate.as_deref());
    let source = settings.source();

    match mode {
        RunMode::Batch(target) => {
            tracing::info!("Analyzing {}", settings.logfile);

            let reader = bootstrap::open_batch_input(&source)?;
            let result = analyze_log(reader, &range).map_err(|e| match &source {
                LogSource::File(path) => RpsError::FileRead {
                    path: path.clone(),
                    source: e,
                },
                LogSource::Stdin => RpsError::Io(e),
            })?;

            let reporter = Reporter::new(target, settings.theme.clone());
            reporter.report(&result, &mut std::io::stdout())?;
        }

        RunMode::Follow => {
            let LogSource::File(path) = source else {
                return Err(RpsError::FollowRequiresFile.into());
            };
            tracing::info!("Following {}", path.display());

            let file = open_log_file(&path)?;
            let engine = FollowEngine::new(file, range, settings.poll_interval());

            // The engine only checks the flag between line reads, so Ctrl+C
            // is turned into a watch update instead of aborting the task.
            let (tx, rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Ctrl+C received; stopping follow");
                    let _ = tx.send(true);
                }
            });

            let summary = engine.run(&mut std::io::stdout(), rx).await?;
            tracing::debug!(accepted = summary.accepted, "follow session complete");
        }
    }

    Ok(())
}
