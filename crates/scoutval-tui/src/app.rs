// Application layer: turns user commands from the TUI into valuation and
// database calls, and packages the outcomes as UI updates.
//
// Errors never escape a command. They are logged and handed to the view
// as display text so one failed query leaves the session usable.

use scoutval_core::config::SearchConfig;
use scoutval_core::db::{PlayerDatabase, PlayerRecord};
use scoutval_core::valuation::features::RawStats;
use scoutval_core::valuation::service::{ScoutReport, SingleValuation, ValuationService};
use tracing::{error, info, warn};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Requests issued by the terminal front end.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Value a hypothetical player.
    Evaluate(RawStats),
    /// Plain database search by name fragment.
    Compare(String),
    /// Scouting comparison by name fragment.
    Scout(String),
    Quit,
}

/// Outcome of a name search, tagged with the filter that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<T> {
    pub filter: String,
    pub result: Result<T, String>,
}

/// Results pushed back to the view.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Valuation(Result<SingleValuation, String>),
    Compare(SearchOutcome<Vec<PlayerRecord>>),
    Scout(SearchOutcome<ScoutReport>),
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    service: ValuationService,
    db: PlayerDatabase,
    search: SearchConfig,
}

impl App {
    pub fn new(service: ValuationService, db: PlayerDatabase, search: SearchConfig) -> Self {
        App {
            service,
            db,
            search,
        }
    }

    pub fn service(&self) -> &ValuationService {
        &self.service
    }

    pub fn database(&self) -> &PlayerDatabase {
        &self.db
    }

    /// Execute one command. `Quit` produces no update; the caller owns
    /// shutdown.
    pub fn handle_command(&self, cmd: UserCommand) -> Option<UiUpdate> {
        match cmd {
            UserCommand::Evaluate(raw) => {
                let result = self.service.evaluate_single(&raw).map_err(|e| {
                    warn!("valuation for {} failed: {}", raw.league, e);
                    e.to_string()
                });
                Some(UiUpdate::Valuation(result))
            }
            UserCommand::Compare(filter) => {
                let result = self
                    .service
                    .browse(&self.db, &filter, self.search.compare_limit)
                    .map_err(|e| {
                        error!("{}", e);
                        e.to_string()
                    });
                Some(UiUpdate::Compare(SearchOutcome { filter, result }))
            }
            UserCommand::Scout(filter) => {
                let result = self
                    .service
                    .scout(&self.db, &filter, self.search.scout_limit)
                    .map_err(|e| {
                        error!("{}", e);
                        e.to_string()
                    });
                Some(UiUpdate::Scout(SearchOutcome { filter, result }))
            }
            UserCommand::Quit => {
                info!("quit requested");
                None
            }
        }
    }
}
