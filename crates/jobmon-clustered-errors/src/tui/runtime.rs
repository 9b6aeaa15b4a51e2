/*
[INPUT]:  ErrorLogSource, ClusteredErrorsPanel, crossterm input, shutdown token
[OUTPUT]: Ratatui-based TUI run loop, rendering, and log buffer utilities
[POS]:    TUI runtime loop and shared helpers
[UPDATE]: When changing TUI layout, keybindings, or runtime controls
*/

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use anyhow::{Result, anyhow};
use crossterm::event::{Event as CrosstermEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::fmt::MakeWriter;

use jobmon_clustered_errors::runtime::spawn_all;
use jobmon_clustered_errors::{ClusteredErrorsPanel, ErrorLogSource};

use super::app::AppState;
use super::events::handle_key_event;
use super::terminal::TerminalGuard;
use super::ui::{centered_rect, draw_errors_table, draw_header, draw_logs, draw_sample_modal};

const UI_TICK_INTERVAL: Duration = Duration::from_millis(250);
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);
pub(crate) const LOG_BUFFER_CAPACITY: usize = 2000;
pub(crate) const TEST_EXIT_AFTER_TICKS_ENV: &str = "JOBMON_TUI_TEST_EXIT_AFTER_TICKS";

pub type LogBufferHandle = Arc<StdMutex<LogBuffer>>;

#[derive(Debug, Default)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity,
        }
    }

    pub fn push_line(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }
}

#[derive(Clone)]
pub struct LogWriterFactory {
    buffer: LogBufferHandle,
}

impl LogWriterFactory {
    pub fn new(buffer: LogBufferHandle) -> Self {
        Self { buffer }
    }
}

pub struct LogWriter {
    buffer: LogBufferHandle,
    partial: String,
}

impl LogWriter {
    fn push(&self, line: String) {
        let mut guard = self.buffer.lock().expect("log buffer lock");
        guard.push_line(line);
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line = self.partial[..pos].trim_end_matches('\r').to_string();
            self.partial.drain(..=pos);
            self.push(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.partial.is_empty() {
            let line = std::mem::take(&mut self.partial);
            self.push(line);
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            buffer: self.buffer.clone(),
            partial: String::new(),
        }
    }
}

pub(super) enum UiEvent {
    Input(CrosstermEvent),
}

/// Tick budget from the environment, for non-interactive runs.
fn exit_after_ticks() -> Option<u64> {
    std::env::var(TEST_EXIT_AFTER_TICKS_ENV)
        .ok()
        .and_then(|value| value.trim().parse().ok())
}

pub async fn run_tui_with_log(
    source: Arc<dyn ErrorLogSource>,
    panel: ClusteredErrorsPanel,
    log_buffer: LogBufferHandle,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut terminal = TerminalGuard::new()?;
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let input_shutdown = CancellationToken::new();
    let input_shutdown_clone = input_shutdown.clone();

    tokio::task::spawn_blocking(move || {
        while !input_shutdown_clone.is_cancelled() {
            if crossterm::event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                if let Ok(event) = crossterm::event::read() {
                    let _ = event_tx.send(UiEvent::Input(event));
                }
            }
        }
    });

    let mut app = AppState::new(panel, log_buffer);
    let result = run_loop(
        terminal.terminal_mut(),
        &mut app,
        source,
        event_rx,
        shutdown,
        exit_after_ticks(),
    )
    .await;

    input_shutdown.cancel();
    result
}

/// Event loop over any ratatui backend. Only this loop mutates the panel;
/// fetches run as spawned tasks and report back over a channel.
pub(super) async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    source: Arc<dyn ErrorLogSource>,
    mut event_rx: mpsc::UnboundedReceiver<UiEvent>,
    shutdown: CancellationToken,
    exit_after_ticks: Option<u64>,
) -> Result<()> {
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
    app.start();

    let mut tick = tokio::time::interval(UI_TICK_INTERVAL);
    let mut ticks: u64 = 0;
    let mut input_open = true;
    let mut should_quit = false;

    info!(workflow_id = app.panel.workflow_id(), "tui started");
    while !should_quit {
        spawn_all(&source, app.take_commands(), &outcome_tx);

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("shutdown requested");
                should_quit = true;
            }
            _ = tick.tick() => {
                ticks += 1;
                if exit_after_ticks.is_some_and(|limit| ticks >= limit) {
                    debug!(ticks, "tick budget reached");
                    should_quit = true;
                }
            }
            Some(outcome) = outcome_rx.recv() => {
                app.apply_outcome(outcome);
            }
            maybe_event = event_rx.recv(), if input_open => {
                match maybe_event {
                    Some(UiEvent::Input(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        if handle_key_event(app, key.code) {
                            should_quit = true;
                        }
                    }
                    Some(_) => {}
                    None => input_open = false,
                }
            }
        }

        app.sync_table_selection();
        terminal
            .draw(|frame| draw_ui(frame, app))
            .map_err(|err| anyhow!("draw terminal: {err}"))?;
    }

    info!("tui stopped");
    Ok(())
}

pub(super) fn draw_ui(frame: &mut ratatui::Frame, app: &mut AppState) {
    let area = frame.area();
    let mut constraints = vec![Constraint::Length(3), Constraint::Min(6)];
    if app.show_logs {
        constraints.push(Constraint::Percentage(30));
    }
    constraints.push(Constraint::Length(4));
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    draw_header(frame, layout[0], app);
    draw_errors_table(frame, layout[1], app);
    if app.show_logs {
        draw_logs(frame, layout[2], &app.log_buffer);
    }
    draw_footer(frame, layout[layout.len() - 1], app);

    if app.panel.selection().is_open() {
        draw_sample_modal(frame, centered_rect(area, 80, 80), app);
    }
}

pub(super) fn draw_footer(frame: &mut ratatui::Frame, area: ratatui::layout::Rect, app: &AppState) {
    let key_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let line1 = if app.panel.selection().is_open() {
        Line::from(vec![
            Span::styled("[Left/Right]", key_style),
            Span::raw(" Prev/Next  "),
            Span::styled("[Up/Down]", key_style),
            Span::raw(" Scroll  "),
            Span::styled("[Esc]", key_style),
            Span::raw(" Close"),
        ])
    } else {
        Line::from(vec![
            Span::styled("[Up/Down]", key_style),
            Span::raw(" Select  "),
            Span::styled("[Enter]", key_style),
            Span::raw(" Samples  "),
            Span::styled("[t]", key_style),
            Span::raw(" Template  "),
            Span::styled("[w]", key_style),
            Span::raw(" Workflow  "),
            Span::styled("[s]", key_style),
            Span::raw(" Sort"),
        ])
    };
    let line2 = Line::from(vec![
        Span::styled("[r]", key_style),
        Span::raw(" Refresh  "),
        Span::styled("[L]", key_style),
        Span::raw(" Logs  "),
        Span::styled("[q]", key_style),
        Span::raw(" Quit  "),
        Span::raw(format!("Status: {}", app.status_message)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title("Hotkeys");
    let widget = Paragraph::new(Text::from(vec![line1, line2]))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

pub(crate) fn border_style() -> Style {
    Style::default().fg(Color::Magenta)
}

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn error_style() -> Style {
    Style::default()
        .fg(Color::LightRed)
        .add_modifier(Modifier::BOLD)
}
