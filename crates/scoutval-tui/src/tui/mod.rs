// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the user's inputs and the latest
// results. Key presses become `UserCommand`s executed by the `App`; the
// resulting `UiUpdate`s are folded into `ViewState` and the frame is redrawn
// at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tracing::{error, info};

use scoutval_core::db::PlayerRecord;
use scoutval_core::valuation::features::{normalize, Normalized, RawStats};
use scoutval_core::valuation::league::LeagueTable;
use scoutval_core::valuation::service::{ScoutReport, SingleValuation};

use crate::app::{App, SearchOutcome, UiUpdate, UserCommand};
use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// Tabs and fields
// ---------------------------------------------------------------------------

/// Main panel tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabId {
    Valuation,
    Compare,
    Scout,
}

impl TabId {
    pub const ALL: [TabId; 3] = [TabId::Valuation, TabId::Compare, TabId::Scout];

    pub fn next(self) -> TabId {
        match self {
            TabId::Valuation => TabId::Compare,
            TabId::Compare => TabId::Scout,
            TabId::Scout => TabId::Valuation,
        }
    }

    pub fn prev(self) -> TabId {
        match self {
            TabId::Valuation => TabId::Scout,
            TabId::Compare => TabId::Valuation,
            TabId::Scout => TabId::Compare,
        }
    }

    /// Key into `ViewState::scroll_offset` for tabs with a table.
    pub fn scroll_key(self) -> &'static str {
        match self {
            TabId::Valuation => "valuation",
            TabId::Compare => "compare",
            TabId::Scout => "scout",
        }
    }
}

/// Sidebar input the arrow keys currently act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    League,
    Age,
    Goals,
    Assists,
    Minutes,
}

impl StatField {
    pub const ALL: [StatField; 5] = [
        StatField::League,
        StatField::Age,
        StatField::Goals,
        StatField::Assists,
        StatField::Minutes,
    ];

    pub fn next(self) -> StatField {
        let i = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> StatField {
        let i = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state: user inputs plus the most recent result of each kind.
pub struct ViewState {
    pub active_tab: TabId,
    /// League table used for the sidebar list and live breakdown.
    pub leagues: LeagueTable,
    /// Index into `leagues` of the selected league.
    pub league_index: usize,
    /// Current what-if inputs. `stats.league` tracks `league_index`.
    pub stats: RawStats,
    pub selected_field: StatField,
    /// One-line model status for the status bar.
    pub model_status: String,
    pub model_available: bool,
    pub database_path: String,
    pub valuation: Option<Result<SingleValuation, String>>,
    pub compare: Option<SearchOutcome<Vec<PlayerRecord>>>,
    pub scout: Option<SearchOutcome<ScoutReport>>,
    /// Whether the search prompt is capturing keys.
    pub search_mode: bool,
    pub search_text: String,
    /// Per-tab table scroll offsets (keyed by `TabId::scroll_key`).
    pub scroll_offset: HashMap<String, usize>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(
            LeagueTable::standard(),
            "model unavailable: not loaded".to_string(),
            false,
            String::new(),
        )
    }
}

impl ViewState {
    pub fn new(
        leagues: LeagueTable,
        model_status: String,
        model_available: bool,
        database_path: String,
    ) -> Self {
        let defaults = RawStats::default();
        let league_index = leagues
            .entries()
            .iter()
            .position(|e| e.id == defaults.league)
            .unwrap_or(0);
        let league = leagues
            .entries()
            .get(league_index)
            .map(|e| e.id.clone())
            .unwrap_or_default();

        ViewState {
            active_tab: TabId::Valuation,
            leagues,
            league_index,
            stats: RawStats { league, ..defaults },
            selected_field: StatField::League,
            model_status,
            model_available,
            database_path,
            valuation: None,
            compare: None,
            scout: None,
            search_mode: false,
            search_text: String::new(),
            scroll_offset: HashMap::new(),
        }
    }

    /// Select the league at `index`, wrapping around the table.
    pub fn select_league(&mut self, index: usize) {
        let len = self.leagues.len();
        if len == 0 {
            return;
        }
        self.league_index = index % len;
        if let Some(entry) = self.leagues.entries().get(self.league_index) {
            self.stats.league = entry.id.clone();
        }
    }

    /// Weighted stats for the current inputs, recomputed on every draw.
    pub fn breakdown(&self) -> Option<Normalized> {
        normalize(&self.stats, &self.leagues).ok()
    }

    pub fn scroll(&self, tab: TabId) -> usize {
        self.scroll_offset.get(tab.scroll_key()).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Fold one result into the ViewState and bring its tab forward.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Valuation(result) => {
            state.valuation = Some(result);
            state.active_tab = TabId::Valuation;
        }
        UiUpdate::Compare(outcome) => {
            state.compare = Some(outcome);
            state.scroll_offset.remove(TabId::Compare.scroll_key());
            state.active_tab = TabId::Compare;
        }
        UiUpdate::Scout(outcome) => {
            state.scout = Some(outcome);
            state.scroll_offset.remove(TabId::Scout.scroll_key());
            state.active_tab = TabId::Scout;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    match state.active_tab {
        TabId::Valuation => widgets::valuation::render(frame, layout.main_panel, state),
        TabId::Compare => widgets::compare::render(frame, layout.main_panel, state),
        TabId::Scout => widgets::scout::render(frame, layout.main_panel, state),
    }
    widgets::leagues::render(frame, layout.leagues, state);
    widgets::stats_panel::render(frame, layout.stats, state);
    render_help_bar(frame, &layout, state);
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let line = if state.search_mode {
        Line::from(vec![
            Span::styled(
                " Search player: ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(state.search_text.clone(), Style::default().fg(Color::White)),
            Span::styled("_", Style::default().fg(Color::Yellow)),
            Span::styled("  Enter:Run | Esc:Cancel", Style::default().fg(Color::Gray)),
        ])
    } else {
        Line::from(Span::styled(
            help_text(state.active_tab),
            Style::default().fg(Color::White).add_modifier(Modifier::DIM),
        ))
    };
    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

fn help_text(tab: TabId) -> &'static str {
    match tab {
        TabId::Valuation => {
            " q:Quit | 1-3:Tabs | Up/Down:Field | Left/Right:Adjust | v/Enter:Estimate"
        }
        TabId::Compare | TabId::Scout => {
            " q:Quit | 1-3:Tabs | /:Search | PgUp/PgDn:Scroll | v/Enter:Estimate"
        }
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits.
///
/// Commands run inline on the loop; each one is a single short SQLite query
/// or model evaluation.
pub async fn run(app: App) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let predictor = app.service().predictor();
    let mut view_state = ViewState::new(
        app.service().leagues().clone(),
        predictor.status(),
        predictor.is_available(),
        app.database().path().display().to_string(),
    );

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        match input::handle_key(key_event, &mut view_state) {
                            Some(UserCommand::Quit) => break,
                            Some(cmd) => {
                                if let Some(update) = app.handle_command(cmd) {
                                    apply_ui_update(&mut view_state, update);
                                }
                            }
                            None => {}
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("terminal input error: {}", e);
                        break;
                    }
                    None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();
    info!("TUI closed");

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use scoutval_core::valuation::features::FeatureVector;
    use scoutval_core::valuation::service::{ScoutStatus, Tier};
    use scoutval_core::valuation::ValueEstimate;

    fn sample_valuation() -> SingleValuation {
        SingleValuation {
            features: FeatureVector {
                age: 24.0,
                goals_weighted: 10.0,
                assists_weighted: 5.0,
                minutes_played: 2000.0,
            },
            multiplier: 1.0,
            estimate: ValueEstimate(12_000_000.0),
            tier: Some(Tier::SolidProfessional),
        }
    }

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert_eq!(state.active_tab, TabId::Valuation);
        assert_eq!(state.selected_field, StatField::League);
        assert_eq!(state.stats, RawStats::default());
        assert_eq!(state.league_index, 0);
        assert!(state.valuation.is_none());
        assert!(state.compare.is_none());
        assert!(state.scout.is_none());
        assert!(!state.search_mode);
        assert!(state.scroll_offset.is_empty());
    }

    #[test]
    fn select_league_wraps_and_updates_stats() {
        let mut state = ViewState::default();
        state.select_league(1);
        assert_eq!(state.stats.league, "Serie A (Italy)");
        state.select_league(15);
        assert_eq!(state.league_index, 0);
        assert_eq!(state.stats.league, "Premier League (England)");
    }

    #[test]
    fn breakdown_tracks_inputs() {
        let mut state = ViewState::default();
        state.select_league(1);
        let b = state.breakdown().unwrap();
        assert_eq!(b.multiplier, 0.89);
        assert_eq!(b.features.goals_weighted, 10.0 * 0.89);
    }

    #[test]
    fn field_cycle_wraps() {
        assert_eq!(StatField::League.prev(), StatField::Minutes);
        assert_eq!(StatField::Minutes.next(), StatField::League);
        assert_eq!(TabId::Scout.next(), TabId::Valuation);
        assert_eq!(TabId::Valuation.prev(), TabId::Scout);
    }

    #[test]
    fn apply_valuation_switches_tab() {
        let mut state = ViewState::default();
        state.active_tab = TabId::Scout;
        apply_ui_update(&mut state, UiUpdate::Valuation(Ok(sample_valuation())));
        assert_eq!(state.active_tab, TabId::Valuation);
        assert!(matches!(state.valuation, Some(Ok(_))));
    }

    #[test]
    fn apply_scout_resets_scroll() {
        let mut state = ViewState::default();
        state.scroll_offset.insert("scout".into(), 7);
        apply_ui_update(
            &mut state,
            UiUpdate::Scout(SearchOutcome {
                filter: "x".into(),
                result: Ok(ScoutReport {
                    rows: Vec::new(),
                    status: ScoutStatus::NoPlayersFound,
                    alert: None,
                }),
            }),
        );
        assert_eq!(state.active_tab, TabId::Scout);
        assert_eq!(state.scroll(TabId::Scout), 0);
    }

    #[test]
    fn apply_compare_error_is_kept_for_display() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::Compare(SearchOutcome {
                filter: "x".into(),
                result: Err("db gone".into()),
            }),
        );
        assert_eq!(state.active_tab, TabId::Compare);
        assert_eq!(
            state.compare.as_ref().unwrap().result,
            Err("db gone".to_string())
        );
    }

    #[test]
    fn render_frame_every_tab() {
        for tab in TabId::ALL {
            let backend = ratatui::backend::TestBackend::new(140, 40);
            let mut terminal = ratatui::Terminal::new(backend).unwrap();
            let mut state = ViewState::default();
            state.active_tab = tab;
            state.search_mode = tab == TabId::Scout;
            terminal
                .draw(|frame| render_frame(frame, &state))
                .unwrap();
        }
    }

    #[test]
    fn render_frame_tiny_terminal() {
        let backend = ratatui::backend::TestBackend::new(30, 8);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
    }
}
