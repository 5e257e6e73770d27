// Player stats widget: steppers for age, goals, assists and minutes, plus a
// live breakdown of the league-weighted values the model will see.

use std::ops::RangeInclusive;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use scoutval_core::valuation::features::{AGE_RANGE, ASSISTS_RANGE, GOALS_RANGE, MINUTES_RANGE};

use crate::tui::{StatField, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.selected_field != StatField::League;
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let paragraph = Paragraph::new(build_stat_lines(state)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Player Stats"),
    );
    frame.render_widget(paragraph, area);
}

pub fn build_stat_lines(state: &ViewState) -> Vec<Line<'static>> {
    let stats = &state.stats;
    let mut lines = vec![
        stepper_line("Age", stats.age, AGE_RANGE, state.selected_field == StatField::Age),
        stepper_line("Goals", stats.goals, GOALS_RANGE, state.selected_field == StatField::Goals),
        stepper_line(
            "Assists",
            stats.assists,
            ASSISTS_RANGE,
            state.selected_field == StatField::Assists,
        ),
        stepper_line(
            "Minutes",
            stats.minutes_played,
            MINUTES_RANGE,
            state.selected_field == StatField::Minutes,
        ),
        Line::from(""),
    ];

    match state.breakdown() {
        Some(b) => {
            lines.push(kv_line("League weight", format!("x{:.2}", b.multiplier)));
            lines.push(kv_line("Goals (wtd)", format!("{:.2}", b.features.goals_weighted)));
            lines.push(kv_line("Assists (wtd)", format!("{:.2}", b.features.assists_weighted)));
        }
        None => lines.push(Line::from(Span::styled(
            " Unknown league",
            Style::default().fg(Color::Red),
        ))),
    }

    lines
}

fn stepper_line(
    label: &str,
    value: u32,
    range: RangeInclusive<u32>,
    selected: bool,
) -> Line<'static> {
    let (marker, style) = if selected {
        (
            ">",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else {
        (" ", Style::default().fg(Color::White))
    };
    Line::from(vec![
        Span::styled(format!("{marker}{label:<9}"), style),
        Span::styled(format!("< {value:>4} >"), style),
        Span::styled(
            format!("  [{}-{}]", range.start(), range.end()),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn kv_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {label:<14}"), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::Cyan)),
    ])
}
