/*
[INPUT]:  Template selection, row activation, prev/next/close actions, fetch outcomes
[OUTPUT]: Panel state plus explicit fetch commands for the runtime to execute
[POS]:    Panel core - controller for the clustered errors panel
[UPDATE]: When adding panel actions or changing how results are applied
*/

use std::time::Duration;

use jobmon_adapter::{ErrorDetail, ErrorGroup, JobmonError, WorkflowDetails};
use tracing::{debug, info, warn};

use crate::paging::{SampleCursor, Selection};
use crate::query::{DetailQueryKey, FetchState, GroupCache, GroupQueryKey};
use crate::view::{SortOrder, sorted_groups};

/// Work the runtime must perform on behalf of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    FetchGroups(GroupQueryKey),
    FetchDetail(DetailQueryKey),
    FetchWorkflow(u64),
}

/// Result of executing a [`PanelCommand`], tagged with the key it was issued for.
#[derive(Debug)]
pub enum FetchOutcome {
    Groups {
        key: GroupQueryKey,
        result: Result<Vec<ErrorGroup>, JobmonError>,
    },
    Detail {
        key: DetailQueryKey,
        result: Result<Option<ErrorDetail>, JobmonError>,
    },
    Workflow {
        workflow_id: u64,
        result: Result<Option<WorkflowDetails>, JobmonError>,
    },
}

/// State of the clustered errors panel for one workflow.
pub struct ClusteredErrorsPanel {
    workflow_id: u64,
    task_template_id: Option<u64>,
    groups: FetchState<Vec<ErrorGroup>>,
    active_groups: Option<GroupQueryKey>,
    cache: GroupCache,
    sort: SortOrder,
    selection: Selection,
    selection_epoch: u64,
    detail: FetchState<ErrorDetail>,
    active_detail: Option<DetailQueryKey>,
    workflow: Option<WorkflowDetails>,
}

impl ClusteredErrorsPanel {
    pub fn new(workflow_id: u64, cache_ttl: Duration) -> Self {
        Self {
            workflow_id,
            task_template_id: None,
            groups: FetchState::Disabled,
            active_groups: None,
            cache: GroupCache::new(cache_ttl),
            sort: SortOrder::default(),
            selection: Selection::Closed,
            selection_epoch: 0,
            detail: FetchState::Disabled,
            active_detail: None,
            workflow: None,
        }
    }

    /// Preselect a task template; nothing is fetched until [`Self::start`].
    pub fn with_task_template(mut self, task_template_id: Option<u64>) -> Self {
        self.task_template_id = task_template_id.filter(|id| *id != 0);
        self
    }

    /// Commands to run when the panel is first shown
    pub fn start(&mut self) -> Vec<PanelCommand> {
        let mut commands = vec![PanelCommand::FetchWorkflow(self.workflow_id)];
        commands.extend(self.load_groups());
        commands
    }

    pub fn workflow_id(&self) -> u64 {
        self.workflow_id
    }

    pub fn task_template_id(&self) -> Option<u64> {
        self.task_template_id
    }

    pub fn groups(&self) -> &FetchState<Vec<ErrorGroup>> {
        &self.groups
    }

    pub fn detail(&self) -> &FetchState<ErrorDetail> {
        &self.detail
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn workflow(&self) -> Option<&WorkflowDetails> {
        self.workflow.as_ref()
    }

    /// Switch workflow. Groups for the current template and the workflow
    /// header are fetched for the new id.
    pub fn set_workflow(&mut self, workflow_id: u64) -> Vec<PanelCommand> {
        if workflow_id == self.workflow_id {
            return Vec::new();
        }
        info!(
            old_workflow_id = self.workflow_id,
            workflow_id, "workflow changed"
        );
        self.workflow_id = workflow_id;
        self.workflow = None;
        self.close_sample();
        let mut commands = vec![PanelCommand::FetchWorkflow(workflow_id)];
        commands.extend(self.load_groups());
        commands
    }

    /// Switch task template. Zero counts as "none selected".
    pub fn set_task_template(&mut self, task_template_id: Option<u64>) -> Vec<PanelCommand> {
        let task_template_id = task_template_id.filter(|id| *id != 0);
        if task_template_id == self.task_template_id {
            return Vec::new();
        }
        info!(
            workflow_id = self.workflow_id,
            ?task_template_id,
            "task template changed"
        );
        self.task_template_id = task_template_id;
        self.close_sample();
        self.load_groups()
    }

    /// Drop the cached groups for the current template and fetch again.
    /// An open sample is fetched again too.
    pub fn refresh(&mut self) -> Vec<PanelCommand> {
        if let Some(key) = self.group_key() {
            self.cache.invalidate(&key);
        }
        let mut commands = self.load_groups();
        commands.extend(self.issue_detail());
        commands
    }

    fn group_key(&self) -> Option<GroupQueryKey> {
        self.task_template_id.map(|task_template_id| GroupQueryKey {
            workflow_id: self.workflow_id,
            task_template_id,
        })
    }

    fn load_groups(&mut self) -> Vec<PanelCommand> {
        let Some(key) = self.group_key() else {
            self.groups = FetchState::Disabled;
            self.active_groups = None;
            return Vec::new();
        };

        self.active_groups = Some(key);
        if let Some(cached) = self.cache.get(&key) {
            debug!(?key, "clustered errors served from cache");
            self.groups = FetchState::Ready(cached);
            return Vec::new();
        }

        self.groups = FetchState::Loading;
        vec![PanelCommand::FetchGroups(key)]
    }

    /// Activate the group shown at `row` of the table (in display order).
    pub fn select_group(&mut self, row: usize) -> Vec<PanelCommand> {
        let ids = match self.groups.data() {
            Some(groups) => match sorted_groups(groups, self.sort).get(row) {
                Some(group) => group.task_instance_ids.clone(),
                None => return Vec::new(),
            },
            None => return Vec::new(),
        };

        self.selection_epoch += 1;
        if !self.selection.select(ids) {
            warn!(row, "error group has no task instances; nothing to show");
            self.detail = FetchState::Disabled;
            self.active_detail = None;
            return Vec::new();
        }
        self.issue_detail()
    }

    pub fn next_sample(&mut self) -> Vec<PanelCommand> {
        if self.selection.next() {
            return self.issue_detail();
        }
        Vec::new()
    }

    pub fn previous_sample(&mut self) -> Vec<PanelCommand> {
        if self.selection.previous() {
            return self.issue_detail();
        }
        Vec::new()
    }

    pub fn close_sample(&mut self) {
        self.selection.close();
        self.detail = FetchState::Disabled;
        self.active_detail = None;
    }

    /// Cycle the occurrences sort; an open sample keeps its cursor.
    pub fn cycle_sort(&mut self) -> SortOrder {
        self.sort = self.sort.next();
        self.sort
    }

    fn issue_detail(&mut self) -> Vec<PanelCommand> {
        let (Some(task_template_id), Some(cursor)) = (self.task_template_id, self.selection.cursor())
        else {
            return Vec::new();
        };
        let key = detail_key(self.workflow_id, task_template_id, self.selection_epoch, cursor);
        self.detail = FetchState::Loading;
        self.active_detail = Some(key);
        vec![PanelCommand::FetchDetail(key)]
    }

    /// Fold a fetch result into the panel. Returns `false` for results whose
    /// key is no longer active.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        match outcome {
            FetchOutcome::Groups { key, result } => self.apply_groups(key, result),
            FetchOutcome::Detail { key, result } => self.apply_detail(key, result),
            FetchOutcome::Workflow {
                workflow_id,
                result,
            } => self.apply_workflow(workflow_id, result),
        }
    }

    pub fn apply_groups(
        &mut self,
        key: GroupQueryKey,
        result: Result<Vec<ErrorGroup>, JobmonError>,
    ) -> bool {
        if self.active_groups != Some(key) {
            debug!(?key, "dropping stale clustered errors response");
            return false;
        }
        match result {
            Ok(groups) => {
                info!(?key, groups = groups.len(), "clustered errors loaded");
                self.cache.insert(key, groups.clone());
                self.groups = FetchState::Ready(groups);
            }
            Err(err) => {
                warn!(?key, error = %err, "clustered errors request failed");
                self.groups = FetchState::Failed(err.to_string());
            }
        }
        true
    }

    pub fn apply_detail(
        &mut self,
        key: DetailQueryKey,
        result: Result<Option<ErrorDetail>, JobmonError>,
    ) -> bool {
        if self.active_detail != Some(key) {
            debug!(?key, "dropping stale error detail response");
            return false;
        }
        self.detail = match result {
            Ok(Some(detail)) => FetchState::Ready(detail),
            Ok(None) => {
                warn!(task_instance_id = key.task_instance_id, "error detail response was empty");
                FetchState::Failed(format!(
                    "no error record for task instance {}",
                    key.task_instance_id
                ))
            }
            Err(err) => {
                warn!(task_instance_id = key.task_instance_id, error = %err, "error detail request failed");
                FetchState::Failed(err.to_string())
            }
        };
        true
    }

    pub fn apply_workflow(
        &mut self,
        workflow_id: u64,
        result: Result<Option<WorkflowDetails>, JobmonError>,
    ) -> bool {
        if workflow_id != self.workflow_id {
            return false;
        }
        match result {
            Ok(details) => self.workflow = details,
            Err(err) => warn!(workflow_id, error = %err, "workflow details request failed"),
        }
        true
    }
}

fn detail_key(
    workflow_id: u64,
    task_template_id: u64,
    selection_epoch: u64,
    cursor: &SampleCursor,
) -> DetailQueryKey {
    DetailQueryKey {
        workflow_id,
        task_template_id,
        selection_epoch,
        sample_index: cursor.index(),
        task_instance_id: cursor.current(),
    }
}
