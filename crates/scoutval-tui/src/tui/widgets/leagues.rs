// League list widget: every supported league with its strength multiplier.
// The selected league is highlighted; the border lights up while the league
// field has focus.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::tui::{StatField, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let items: Vec<ListItem> = state
        .leagues
        .entries()
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::raw(entry.id.clone()),
                Span::styled(
                    format!("  x{:.2}", entry.multiplier),
                    Style::default().fg(multiplier_color(entry.multiplier)),
                ),
            ]))
        })
        .collect();

    let focused = state.selected_field == StatField::League;
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("League"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.league_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Stronger leagues read greener.
pub fn multiplier_color(multiplier: f64) -> Color {
    if multiplier >= 0.8 {
        Color::Green
    } else if multiplier >= 0.5 {
        Color::Yellow
    } else {
        Color::Gray
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_color_bands() {
        assert_eq!(multiplier_color(1.0), Color::Green);
        assert_eq!(multiplier_color(0.80), Color::Green);
        assert_eq!(multiplier_color(0.63), Color::Yellow);
        assert_eq!(multiplier_color(0.15), Color::Gray);
    }

    #[test]
    fn render_lists_leagues() {
        let backend = ratatui::backend::TestBackend::new(50, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text = crate::tui::widgets::buffer_text(terminal.backend().buffer());
        assert!(text.contains("> Premier League (England)  x1.00"), "{text}");
        assert!(text.contains("Serie A (Italy)  x0.89"));
    }

    #[test]
    fn render_keeps_selection_visible() {
        let backend = ratatui::backend::TestBackend::new(50, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.select_league(14);
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text = crate::tui::widgets::buffer_text(terminal.backend().buffer());
        assert!(text.contains("MLS/Other"), "{text}");
    }
}
