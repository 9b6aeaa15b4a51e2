/*
[INPUT]:  LogBufferHandle snapshots for UI
[OUTPUT]: Log pane with fetch warnings and errors highlighted
[POS]:    TUI UI logs panel rendering
[UPDATE]: When changing how log lines are shown
*/

use std::sync::PoisonError;

use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::runtime::{LogBufferHandle, border_style, error_style};

pub(in crate::tui) fn draw_logs(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    buffer: &LogBufferHandle,
) {
    let lines = buffer
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .snapshot();
    let visible = area.height.saturating_sub(2) as usize;
    let tail = &lines[lines.len().saturating_sub(visible)..];

    let text: Vec<Line> = tail
        .iter()
        .map(|line| Line::styled(line.as_str(), level_style(line)))
        .collect();
    let pane = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Logs (L to hide)"),
    );
    frame.render_widget(pane, area);
}

/// Failed fetches are logged at warn/error; make them stand out.
fn level_style(line: &str) -> Style {
    if line.contains(" ERROR ") {
        error_style()
    } else if line.contains(" WARN ") {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_style_highlights_failures() {
        let warn = "2024-01-01T00:00:00Z  WARN jobmon_clustered_errors::panel: clustered errors request failed";
        let error = "2024-01-01T00:00:00Z ERROR jobmon_adapter::http::client: request failed";
        let info = "2024-01-01T00:00:00Z  INFO jobmon_clustered_errors::panel: clustered errors loaded";

        assert_eq!(level_style(warn).fg, Some(Color::Yellow));
        assert_eq!(level_style(error), error_style());
        assert_eq!(level_style(info), Style::default());
    }
}
