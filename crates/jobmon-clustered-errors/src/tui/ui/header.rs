/*
[INPUT]:  Workflow details, task template and workflow inputs, sort order
[OUTPUT]: Header bar rendered into Ratatui frame
[POS]:    TUI UI header rendering
[UPDATE]: When changing header content or the template editor
*/

use jobmon_clustered_errors::report::workflow_header;
use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{AppState, InputMode};
use crate::tui::runtime::border_style;

pub(in crate::tui) fn draw_header(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    app: &AppState,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(30)])
        .split(area);

    let panel = &app.panel;
    let title = workflow_header(panel.workflow_id(), panel.workflow());
    let workflow = Paragraph::new(Line::from(vec![
        Span::raw(title),
        Span::styled(
            format!("  sort: {:?}", panel.sort()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Clustered Errors"),
    );
    frame.render_widget(workflow, columns[0]);

    let editing = app.input_mode != InputMode::Normal;
    let (input, label) = match app.input_mode {
        InputMode::Workflow => (&app.workflow_input, "Workflow ID"),
        _ => (&app.template_input, "Task Template"),
    };
    let input_area = columns[1];
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let scroll = input.visual_scroll(inner_width);
    let value = if editing || !input.value().is_empty() {
        input.value().to_string()
    } else {
        "press t".to_string()
    };
    let (title, border) = if editing {
        (
            format!("{label} (Enter/Esc)"),
            Style::default().fg(Color::Yellow),
        )
    } else {
        (label.to_string(), border_style())
    };
    let widget = Paragraph::new(value)
        .scroll((0, scroll as u16))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title),
        );
    frame.render_widget(widget, input_area);

    if editing {
        let cursor = input.visual_cursor().max(scroll) - scroll;
        frame.set_cursor_position(Position::new(
            input_area.x + 1 + cursor as u16,
            input_area.y + 1,
        ));
    }
}
