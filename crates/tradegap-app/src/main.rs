// Trade analyzer entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, keep the terminal for the report)
// 2. Load config, copying defaults on first run
// 3. Load tables, analyze, print the report, export

use anyhow::Context;
use tracing::info;

use tradegap_app::{app, config};

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("tradegap starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, team={:?}",
        config.league.name, config.league.my_team
    );

    let output = app::run(&config, &chrono::Local::now())?;

    println!("{}", output.report);
    for path in &output.exported {
        println!("Exported: {}", path.display());
    }

    info!("analysis for '{}' complete", output.team);
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which shows the
/// report).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("tradegap.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tradegap=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
