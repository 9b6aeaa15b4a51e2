/*
[INPUT]:  ClusteredErrorsPanel, log buffer, key-driven UI actions
[OUTPUT]: AppState wrapping the panel with table, input, and scroll state
[POS]:    TUI app state
[UPDATE]: When adding UI modes or widget state
*/

use chrono::Local;
use jobmon_clustered_errors::query::{parse_task_template, parse_workflow_id};
use jobmon_clustered_errors::view::{GroupsView, groups_view};
use jobmon_clustered_errors::{ClusteredErrorsPanel, FetchOutcome, PanelCommand};
use ratatui::widgets::TableState;
use tui_input::Input;

use super::runtime::LogBufferHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum InputMode {
    Normal,
    /// Editing the task template id
    Template,
    Workflow,
}

pub(super) struct AppState {
    pub(super) panel: ClusteredErrorsPanel,
    pub(super) log_buffer: LogBufferHandle,
    pub(super) table_state: TableState,
    pub(super) input_mode: InputMode,
    pub(super) template_input: Input,
    pub(super) workflow_input: Input,
    pub(super) show_logs: bool,
    pub(super) modal_scroll: u16,
    pub(super) status_message: String,
    pending: Vec<PanelCommand>,
}

impl AppState {
    pub(super) fn new(panel: ClusteredErrorsPanel, log_buffer: LogBufferHandle) -> Self {
        let template = panel
            .task_template_id()
            .map(|id| id.to_string())
            .unwrap_or_default();
        let workflow = panel.workflow_id().to_string();
        Self {
            panel,
            log_buffer,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            template_input: Input::new(template),
            workflow_input: Input::new(workflow),
            show_logs: false,
            modal_scroll: 0,
            status_message: "Ready".to_string(),
            pending: Vec::new(),
        }
    }

    /// Commands produced since the last call
    pub(super) fn take_commands(&mut self) -> Vec<PanelCommand> {
        std::mem::take(&mut self.pending)
    }

    pub(super) fn start(&mut self) {
        let commands = self.panel.start();
        self.pending.extend(commands);
    }

    /// Fold a fetch result into the panel, stamping fresh group loads.
    pub(super) fn apply_outcome(&mut self, outcome: FetchOutcome) {
        let is_groups = matches!(outcome, FetchOutcome::Groups { .. });
        let applied = self.panel.apply(outcome);
        if applied && is_groups && self.panel.groups().data().is_some() {
            self.status_message =
                format!("errors loaded at {}", Local::now().format("%H:%M:%S"));
        }
    }

    fn row_count(&self) -> usize {
        match groups_view(&self.panel) {
            GroupsView::Table(rows) => rows.len(),
            _ => 0,
        }
    }

    /// Keep the highlighted row inside the current table.
    pub(super) fn sync_table_selection(&mut self) {
        let rows = self.row_count();
        match self.table_state.selected() {
            _ if rows == 0 => self.table_state.select(None),
            None => self.table_state.select(Some(0)),
            Some(selected) if selected >= rows => self.table_state.select(Some(rows - 1)),
            Some(_) => {}
        }
    }

    pub(super) fn move_selection(&mut self, delta: isize) {
        let rows = self.row_count();
        if rows == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, (rows - 1) as isize) as usize;
        self.table_state.select(Some(next));
    }

    pub(super) fn open_selected(&mut self) {
        let Some(row) = self.table_state.selected() else {
            return;
        };
        let commands = self.panel.select_group(row);
        if !self.panel.selection().is_open() {
            self.status_message = "error group has no task instances".to_string();
        }
        self.modal_scroll = 0;
        self.pending.extend(commands);
    }

    pub(super) fn next_sample(&mut self) {
        let commands = self.panel.next_sample();
        if !commands.is_empty() {
            self.modal_scroll = 0;
        }
        self.pending.extend(commands);
    }

    pub(super) fn previous_sample(&mut self) {
        let commands = self.panel.previous_sample();
        if !commands.is_empty() {
            self.modal_scroll = 0;
        }
        self.pending.extend(commands);
    }

    pub(super) fn close_sample(&mut self) {
        self.panel.close_sample();
        self.modal_scroll = 0;
    }

    pub(super) fn refresh(&mut self) {
        let commands = self.panel.refresh();
        self.status_message = if commands.is_empty() {
            "select a task template first".to_string()
        } else {
            "refreshing".to_string()
        };
        self.pending.extend(commands);
    }

    pub(super) fn cycle_sort(&mut self) {
        let order = self.panel.cycle_sort();
        self.status_message = format!("sort: {order:?}");
    }

    pub(super) fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
    }

    /// Scroll the error and stderr blocks, stopping at the last line of the
    /// longer one.
    pub(super) fn scroll_modal(&mut self, delta: i16) {
        let max_scroll = self.panel.detail().data().map_or(0, |detail| {
            let error_lines = detail.error.lines().count();
            let stderr_lines = detail
                .task_instance_stderr_log
                .as_deref()
                .map_or(0, |log| log.lines().count());
            error_lines.max(stderr_lines).saturating_sub(1)
        });
        let max_scroll = u16::try_from(max_scroll).unwrap_or(u16::MAX);
        self.modal_scroll = self
            .modal_scroll
            .saturating_add_signed(delta)
            .min(max_scroll);
    }

    pub(super) fn begin_template_edit(&mut self) {
        self.input_mode = InputMode::Template;
    }

    pub(super) fn cancel_template_edit(&mut self) {
        let current = self
            .panel
            .task_template_id()
            .map(|id| id.to_string())
            .unwrap_or_default();
        self.template_input = Input::new(current);
        self.input_mode = InputMode::Normal;
    }

    /// Apply the typed template id. Anything that is not a positive integer
    /// clears the selection.
    pub(super) fn submit_template(&mut self) {
        let task_template_id = parse_task_template(self.template_input.value());
        self.input_mode = InputMode::Normal;
        let commands = self.panel.set_task_template(task_template_id);
        self.table_state.select(None);
        self.status_message = match task_template_id {
            Some(id) => format!("task template {id}"),
            None => "no task template selected".to_string(),
        };
        self.pending.extend(commands);
    }

    /// Input box receiving keystrokes in the current edit mode
    pub(super) fn active_input_mut(&mut self) -> Option<&mut Input> {
        match self.input_mode {
            InputMode::Normal => None,
            InputMode::Template => Some(&mut self.template_input),
            InputMode::Workflow => Some(&mut self.workflow_input),
        }
    }

    pub(super) fn begin_workflow_edit(&mut self) {
        self.workflow_input = Input::new(self.panel.workflow_id().to_string());
        self.input_mode = InputMode::Workflow;
    }

    pub(super) fn cancel_workflow_edit(&mut self) {
        self.workflow_input = Input::new(self.panel.workflow_id().to_string());
        self.input_mode = InputMode::Normal;
    }

    /// Switch to the typed workflow id. Invalid input keeps the current one.
    pub(super) fn submit_workflow(&mut self) {
        self.input_mode = InputMode::Normal;
        let Some(workflow_id) = parse_workflow_id(self.workflow_input.value()) else {
            self.workflow_input = Input::new(self.panel.workflow_id().to_string());
            self.status_message = "invalid workflow id".to_string();
            return;
        };
        let commands = self.panel.set_workflow(workflow_id);
        if !commands.is_empty() {
            self.table_state.select(None);
        }
        self.status_message = format!("workflow {workflow_id}");
        self.pending.extend(commands);
    }
}
