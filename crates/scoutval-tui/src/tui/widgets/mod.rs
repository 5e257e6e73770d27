// TUI widget modules for each dashboard panel.

pub mod compare;
pub mod leagues;
pub mod scout;
pub mod stats_panel;
pub mod status_bar;
pub mod valuation;

use scoutval_core::valuation::format_eur;

/// Currency cell text; `--` for missing values.
pub fn eur_or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "--".to_string(), format_eur)
}

/// Number cell text with `precision` decimals; `--` for missing values.
pub fn num_or_dash(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "--".to_string(), |v| format!("{v:.precision$}"))
}

/// All rows of a test buffer joined with newlines.
#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area;
    (0..area.height)
        .map(|y| {
            (0..area.width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
