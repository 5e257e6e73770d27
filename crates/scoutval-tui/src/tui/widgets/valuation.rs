// Valuation widget: estimated market value, tier message, and the feature
// vector the model was given.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use scoutval_core::valuation::service::{SingleValuation, Tier};

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines = match &state.valuation {
        None => idle_lines(state.model_available),
        Some(Ok(v)) => result_lines(v),
        Some(Err(msg)) => vec![Line::from(Span::styled(
            format!(" {msg}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Valuation"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn idle_lines(model_available: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(
        " Set the player's league and stats in the sidebar, then press v to estimate.",
    )];
    if !model_available {
        lines.push(Line::from(Span::styled(
            " The model is not loaded; estimates are unavailable.",
            Style::default().fg(Color::Yellow),
        )));
    }
    lines
}

pub fn result_lines(v: &SingleValuation) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(" Estimated market value: ", Style::default().fg(Color::Gray)),
            Span::styled(
                v.estimate.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    if let Some(tier) = v.tier {
        lines.push(Line::from(Span::styled(
            format!(" {}", tier.message()),
            Style::default().fg(tier_color(tier)).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        " Model inputs",
        Style::default().add_modifier(Modifier::UNDERLINED),
    )));
    let f = &v.features;
    for (label, value) in [
        ("age", format!("{:.0}", f.age)),
        ("goals_weighted", format!("{:.2}", f.goals_weighted)),
        ("assists_weighted", format!("{:.2}", f.assists_weighted)),
        ("minutes_played", format!("{:.0}", f.minutes_played)),
        ("league multiplier", format!("x{:.2}", v.multiplier)),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("   {label:<18}"), Style::default().fg(Color::Gray)),
            Span::raw(value),
        ]));
    }
    lines
}

pub fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Superstar => Color::Green,
        Tier::SolidProfessional => Color::Cyan,
        Tier::YouthOrLowerLeague => Color::Yellow,
    }
}
