/*
[INPUT]:  Open sample cursor and detail fetch state via ModalView
[OUTPUT]: Error sample modal overlay rendered into Ratatui frame
[POS]:    TUI UI sample modal
[UPDATE]: When changing modal layout, paging controls, or detail fields
*/

use jobmon_clustered_errors::view::{DETAIL_FAILED_MESSAGE, DetailView, ModalBody, modal_view};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::app::AppState;
use crate::tui::runtime::{border_style, error_style};

pub(in crate::tui) fn draw_sample_modal(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let Some(view) = modal_view(&app.panel) else {
        return;
    };
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(view.title.as_str());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(inner);

    let pager = Line::from(vec![
        control("< Prev", view.can_previous),
        Span::raw(format!("   {}   ", view.position)),
        control("Next >", view.can_next),
    ]);
    frame.render_widget(Paragraph::new(pager).alignment(Alignment::Center), sections[0]);

    match &view.body {
        ModalBody::Loading => {
            let loading = Paragraph::new("Loading error details...").alignment(Alignment::Center);
            frame.render_widget(loading, sections[1]);
        }
        ModalBody::Failed => {
            let failed = Paragraph::new(DETAIL_FAILED_MESSAGE)
                .style(error_style())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(failed, sections[1]);
        }
        ModalBody::Detail(detail) => draw_detail(frame, sections[1], detail, app.modal_scroll),
    }
}

fn control(label: &str, enabled: bool) -> Span<'_> {
    let style = if enabled {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(label, style)
}

fn draw_detail(frame: &mut ratatui::Frame, area: Rect, detail: &DetailView, scroll: u16) {
    let grid_height = detail.fields.len() as u16 + 2;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(grid_height),
            Constraint::Percentage(40),
            Constraint::Min(3),
        ])
        .split(area);

    let label_width = detail
        .fields
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    let label_style = Style::default().add_modifier(Modifier::BOLD);
    let grid = detail
        .fields
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:<label_width$}  "), label_style),
                Span::raw(value.as_str()),
            ])
        })
        .collect::<Vec<_>>();
    frame.render_widget(
        Paragraph::new(grid).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Details"),
        ),
        sections[0],
    );

    draw_text_block(frame, sections[1], "Error", &detail.error, scroll);
    draw_text_block(frame, sections[2], "Stderr Log", &detail.stderr_log, scroll);
}

fn draw_text_block(frame: &mut ratatui::Frame, area: Rect, title: &str, text: &str, scroll: u16) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(title),
        );
    frame.render_widget(widget, area);
}
