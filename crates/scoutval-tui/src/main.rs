// scoutval entry point.
//
// Startup sequence:
// 1. Load config (copying defaults on first run)
// 2. Initialize tracing (log to file, not terminal)
// 3. Load the model artifact (missing/corrupt -> valuation disabled)
// 4. Point at the player database
// 5. Run the TUI until the user quits

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use scoutval_core::config::{self, LoggingConfig};
use scoutval_core::db::PlayerDatabase;
use scoutval_core::valuation::league::LeagueTable;
use scoutval_core::valuation::predictor::Predictor;
use scoutval_core::valuation::service::ValuationService;
use scoutval_tui::app::App;
use scoutval_tui::tui;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;
    info!("scoutval starting up");
    info!(
        "Config loaded: model={}, database={}, compare_limit={}, scout_limit={}",
        config.model.path,
        config.database.path,
        config.search.compare_limit,
        config.search.scout_limit
    );

    // 3. Load the model. A feature-layout mismatch aborts startup.
    let predictor = match Predictor::from_artifact(Path::new(&config.model.path)) {
        Ok(predictor) => predictor,
        Err(e) => {
            error!("Model artifact rejected: {}", e);
            return Err(e).context("model artifact does not match the expected features");
        }
    };

    // 4. Player database (opened per query)
    let db = PlayerDatabase::new(&config.database.path);
    if !db.path().exists() {
        warn!(
            "Player database {} not found; comparisons will report errors",
            db.path().display()
        );
    }

    let leagues = LeagueTable::standard();
    info!("League table: {} leagues", leagues.len());
    let service = ValuationService::new(leagues, Arc::new(predictor));
    let app = App::new(service, db, config.search.clone());

    // 5. Run the TUI (blocks until q / Ctrl+C)
    if let Err(e) = tui::run(app).await {
        error!("TUI error: {}", e);
        return Err(e);
    }

    info!("scoutval shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (the terminal belongs to the TUI).
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join(&logging.dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("scoutval.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter)),
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
