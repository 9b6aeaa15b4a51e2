/*
[INPUT]:  TUI app state and layout regions
[OUTPUT]: Panel render functions and module exports
[POS]:    TUI UI module root
[UPDATE]: When adding panels or shared layout helpers
*/

mod errors_table;
mod header;
mod logs;
mod sample_modal;

pub(in crate::tui) use errors_table::draw_errors_table;
pub(in crate::tui) use header::draw_header;
pub(in crate::tui) use logs::draw_logs;
pub(in crate::tui) use sample_modal::draw_sample_modal;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub(in crate::tui) fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
