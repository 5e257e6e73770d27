// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the App, or
// into local ViewState mutations (tab switching, stat steppers, search text,
// scrolling).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use scoutval_core::valuation::features::{AGE_RANGE, ASSISTS_RANGE, GOALS_RANGE, MINUTES_RANGE};

use super::{StatField, TabId, ViewState};
use crate::app::UserCommand;

/// Rows moved by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Multiplier applied to a stepper when Shift is held.
const SHIFT_FACTOR: u32 = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be executed by the
/// App. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both Press and Release.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.search_mode {
        return handle_search_mode(key_event, view_state);
    }

    let shift = key_event.modifiers.contains(KeyModifiers::SHIFT);

    match key_event.code {
        KeyCode::Char('1') => {
            view_state.active_tab = TabId::Valuation;
            None
        }
        KeyCode::Char('2') => {
            view_state.active_tab = TabId::Compare;
            None
        }
        KeyCode::Char('3') => {
            view_state.active_tab = TabId::Scout;
            None
        }
        KeyCode::Tab => {
            view_state.active_tab = view_state.active_tab.next();
            None
        }
        KeyCode::BackTab => {
            view_state.active_tab = view_state.active_tab.prev();
            None
        }

        // Sidebar field selection and steppers
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.selected_field = view_state.selected_field.prev();
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view_state.selected_field = view_state.selected_field.next();
            None
        }
        KeyCode::Left | KeyCode::Char('h') => {
            adjust_field(view_state, Direction::Down, shift);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            adjust_field(view_state, Direction::Up, shift);
            None
        }

        KeyCode::PageUp => {
            scroll_up(view_state, PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            scroll_down(view_state, PAGE_SIZE);
            None
        }

        // Search prompt: only on tabs that show search results
        KeyCode::Char('/') => {
            if view_state.active_tab != TabId::Valuation {
                view_state.search_mode = true;
                view_state.search_text.clear();
            }
            None
        }

        KeyCode::Char('v') | KeyCode::Enter => {
            Some(UserCommand::Evaluate(view_state.stats.clone()))
        }

        KeyCode::Char('q') => Some(UserCommand::Quit),

        _ => None,
    }
}

/// Handle key events while the search prompt is open.
///
/// Enter submits the trimmed text for the active tab; an empty search is
/// dropped without a query. Esc cancels.
fn handle_search_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.search_mode = false;
            view_state.search_text.clear();
            None
        }
        KeyCode::Enter => {
            view_state.search_mode = false;
            let filter = view_state.search_text.trim().to_string();
            if filter.is_empty() {
                return None;
            }
            match view_state.active_tab {
                TabId::Compare => Some(UserCommand::Compare(filter)),
                TabId::Scout => Some(UserCommand::Scout(filter)),
                TabId::Valuation => None,
            }
        }
        KeyCode::Backspace => {
            view_state.search_text.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.search_text.push(c);
            None
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Step the selected sidebar field, clamped to its documented range.
/// The league list wraps.
fn adjust_field(view_state: &mut ViewState, direction: Direction, shift: bool) {
    if view_state.selected_field == StatField::League {
        let len = view_state.leagues.len();
        if len > 0 {
            let next = match direction {
                Direction::Up => view_state.league_index + 1,
                Direction::Down => view_state.league_index + len - 1,
            };
            view_state.select_league(next);
        }
        return;
    }

    let stats = &mut view_state.stats;
    let factor = if shift { SHIFT_FACTOR } else { 1 };
    match view_state.selected_field {
        StatField::League => {}
        StatField::Age => stats.age = step(stats.age, 1, factor, direction, AGE_RANGE),
        StatField::Goals => stats.goals = step(stats.goals, 1, factor, direction, GOALS_RANGE),
        StatField::Assists => {
            stats.assists = step(stats.assists, 1, factor, direction, ASSISTS_RANGE)
        }
        StatField::Minutes => {
            stats.minutes_played =
                step(stats.minutes_played, 10, factor, direction, MINUTES_RANGE)
        }
    }
}

fn step(
    value: u32,
    base: u32,
    factor: u32,
    direction: Direction,
    range: std::ops::RangeInclusive<u32>,
) -> u32 {
    let delta = base * factor;
    let moved = match direction {
        Direction::Up => value.saturating_add(delta),
        Direction::Down => value.saturating_sub(delta),
    };
    moved.clamp(*range.start(), *range.end())
}

fn scroll_up(view_state: &mut ViewState, amount: usize) {
    let key = view_state.active_tab.scroll_key().to_string();
    let offset = view_state.scroll_offset.entry(key).or_insert(0);
    *offset = offset.saturating_sub(amount);
}

/// Scroll down, bounded by the number of rows on the active tab.
fn scroll_down(view_state: &mut ViewState, amount: usize) {
    let rows = match view_state.active_tab {
        TabId::Valuation => 0,
        TabId::Compare => view_state
            .compare
            .as_ref()
            .and_then(|o| o.result.as_ref().ok())
            .map_or(0, Vec::len),
        TabId::Scout => view_state
            .scout
            .as_ref()
            .and_then(|o| o.result.as_ref().ok())
            .map_or(0, |r| r.rows.len()),
    };
    let key = view_state.active_tab.scroll_key().to_string();
    let offset = view_state.scroll_offset.entry(key).or_insert(0);
    *offset = (*offset + amount).min(rows.saturating_sub(1));
}
