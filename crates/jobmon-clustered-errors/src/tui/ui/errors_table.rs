/*
[INPUT]:  Clustered errors panel state via GroupsView
[OUTPUT]: Error group table (or status message) rendered into Ratatui frame
[POS]:    TUI UI clustered errors table
[UPDATE]: When changing table columns or the empty/loading/failure messages
*/

use jobmon_clustered_errors::view::{
    GROUPS_FAILED_MESSAGE, GroupsView, SELECT_TEMPLATE_MESSAGE, first_line, groups_view, truncate,
};
use ratatui::layout::{Alignment, Constraint};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use crate::tui::app::AppState;
use crate::tui::runtime::{border_style, error_style, header_style};

const FIRST_SEEN_WIDTH: u16 = 21;
const OCCURRENCES_WIDTH: u16 = 14;

pub(in crate::tui) fn draw_errors_table(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    app: &mut AppState,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title("Errors");

    let rows = match groups_view(&app.panel) {
        GroupsView::Table(rows) => rows,
        GroupsView::NotSelected => {
            draw_message(frame, area, block, SELECT_TEMPLATE_MESSAGE, Style::default());
            return;
        }
        GroupsView::Loading => {
            draw_message(frame, area, block, "Loading clustered errors...", Style::default());
            return;
        }
        GroupsView::Failed => {
            draw_message(frame, area, block, GROUPS_FAILED_MESSAGE, error_style());
            return;
        }
    };
    if rows.is_empty() {
        draw_message(
            frame,
            area,
            block,
            "No errors found for this task template",
            Style::default(),
        );
        return;
    }

    // borders, highlight symbol, column gaps
    let sample_width = area
        .width
        .saturating_sub(FIRST_SEEN_WIDTH + OCCURRENCES_WIDTH + 6) as usize;
    let header = Row::new(vec![
        Cell::from("Sample Error"),
        Cell::from("First Seen"),
        Cell::from(format!("Occurrences{}", app.panel.sort().indicator())),
    ])
    .style(header_style());

    let table_rows = rows.iter().map(|row| {
        Row::new(vec![
            Cell::from(truncate(first_line(&row.sample_error), sample_width)),
            Cell::from(row.first_seen.clone()),
            Cell::from(row.occurrences.to_string()),
        ])
    });

    let table = Table::new(
        table_rows,
        [
            Constraint::Min(10),
            Constraint::Length(FIRST_SEEN_WIDTH),
            Constraint::Length(OCCURRENCES_WIDTH),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");
    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn draw_message(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    block: Block,
    message: &str,
    style: Style,
) {
    let widget = Paragraph::new(message)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(widget, area);
}
