// Compare widget: plain database search results, no valuation.
//
// Table: Name, Age, League, Market Value, Goals (wtd), Assists (wtd), Minutes

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use scoutval_core::db::PlayerRecord;

use crate::tui::widgets::{eur_or_dash, num_or_dash};
use crate::tui::{TabId, ViewState};

pub const NO_PLAYERS: &str = "No players found with that name.";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(outcome) = &state.compare else {
        render_message(
            frame,
            area,
            "Compare",
            " Press / to search the player database by name.",
            Color::Gray,
        );
        return;
    };

    let title = format!("Compare: \"{}\"", outcome.filter);
    match &outcome.result {
        Err(msg) => render_message(frame, area, &title, &format!(" {msg}"), Color::Red),
        Ok(players) if players.is_empty() => {
            render_message(frame, area, &title, &format!(" {NO_PLAYERS}"), Color::Yellow)
        }
        Ok(players) => {
            let title = format!("{title} ({})", players.len());
            render_table(frame, area, &title, players, state.scroll(TabId::Compare));
        }
    }
}

fn render_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    players: &[PlayerRecord],
    offset: usize,
) {
    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Age"),
        Cell::from("League"),
        Cell::from("Market Value"),
        Cell::from("Goals"),
        Cell::from("Assists"),
        Cell::from("Minutes"),
    ])
    .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = players.iter().map(player_row).collect();

    let widths = [
        Constraint::Min(18),
        Constraint::Length(4),
        Constraint::Length(7),
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));

    let mut table_state = TableState::default().with_offset(offset);
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn player_row(p: &PlayerRecord) -> Row<'static> {
    Row::new(vec![
        Cell::from(p.name.clone()),
        Cell::from(num_or_dash(p.age, 0)),
        Cell::from(p.competition_id.clone().unwrap_or_else(|| "--".to_string())),
        Cell::from(eur_or_dash(p.market_value_in_eur)),
        Cell::from(num_or_dash(p.goals_weighted, 2)),
        Cell::from(num_or_dash(p.assists_weighted, 2)),
        Cell::from(num_or_dash(p.minutes_played, 0)),
    ])
}

/// Bordered single-message panel, shared with the scout tab.
pub(crate) fn render_message(frame: &mut Frame, area: Rect, title: &str, msg: &str, color: Color) {
    let paragraph = Paragraph::new(msg.to_string())
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
