// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-------------------------+------------------------+
// | Main Panel (65%)         | Sidebar (35%)          |
// |                          | +- Leagues (fill) ----+|
// |                          | +- Player Stats (12) -+|
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: model status, database, tab indicator.
    pub status_bar: Rect,
    /// Tab-switched content area.
    pub main_panel: Rect,
    /// League list with multipliers.
    pub leagues: Rect,
    /// Stat steppers and weighted breakdown.
    pub stats: Rect,
    /// Bottom row: key hints or the search prompt.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(10),   // main + sidebar
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(vertical[1]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(12)])
        .split(horizontal[1]);

    AppLayout {
        status_bar: vertical[0],
        main_panel: horizontal[0],
        leagues: sidebar[0],
        stats: sidebar[1],
        help_bar: vertical[2],
    }
}

/// Areas inside the Scout tab.
#[derive(Debug, Clone)]
pub struct ScoutLayout {
    /// Alert or status line.
    pub banner: Rect,
    pub table: Rect,
    pub chart: Rect,
    /// Colour legend under the chart.
    pub caption: Rect,
}

pub fn build_scout_layout(area: Rect) -> ScoutLayout {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(50),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(area);

    ScoutLayout {
        banner: parts[0],
        table: parts[1],
        chart: parts[2],
        caption: parts[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 160, 50)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        let rects = [
            ("status_bar", layout.status_bar),
            ("main_panel", layout.main_panel),
            ("leagues", layout.leagues),
            ("stats", layout.stats),
            ("help_bar", layout.help_bar),
        ];
        for (name, rect) in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn bars_are_one_row() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
    }

    #[test]
    fn sidebar_sits_right_of_main_panel() {
        let layout = build_layout(test_area());
        assert!(layout.main_panel.width > layout.leagues.width);
        assert_eq!(layout.leagues.x, layout.stats.x);
        assert_eq!(
            layout.main_panel.x + layout.main_panel.width,
            layout.leagues.x
        );
        assert_eq!(layout.stats.height, 12);
    }

    #[test]
    fn scout_layout_stacks_vertically() {
        let scout = build_scout_layout(Rect::new(0, 0, 100, 40));
        assert_eq!(scout.banner.height, 3);
        assert_eq!(scout.caption.height, 1);
        assert!(scout.table.y < scout.chart.y);
        assert!(scout.chart.y < scout.caption.y);
    }

    #[test]
    fn small_terminal_does_not_panic() {
        let layout = build_layout(Rect::new(0, 0, 20, 5));
        let _ = build_scout_layout(layout.main_panel);
    }
}
