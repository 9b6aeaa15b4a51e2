/*
[INPUT]:  ClusteredErrorsPanel state
[OUTPUT]: Render-ready view models for the error table and the sample modal
[POS]:    Presentation layer - widget-independent view models and messages
[UPDATE]: When changing table columns, modal content, or user-facing messages
*/

use jobmon_adapter::{ErrorDetail, ErrorGroup};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::panel::ClusteredErrorsPanel;
use crate::paging::Selection;
use crate::query::FetchState;

pub const SELECT_TEMPLATE_MESSAGE: &str =
    "Select a task template from above to view clustered errors";
pub const GROUPS_FAILED_MESSAGE: &str =
    "Unable to retrieve clustered errors. Please refresh and try again";
pub const DETAIL_FAILED_MESSAGE: &str =
    "Failed to retrieve error details. Please refresh and try again";
pub const MODAL_TITLE_PREFIX: &str = "Error Sample for Task Instance ID: ";

/// Client-side ordering of the error table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    OccurrencesDesc,
    OccurrencesAsc,
    /// Order the server returned
    Server,
}

impl SortOrder {
    pub fn next(self) -> Self {
        match self {
            SortOrder::OccurrencesDesc => SortOrder::OccurrencesAsc,
            SortOrder::OccurrencesAsc => SortOrder::Server,
            SortOrder::Server => SortOrder::OccurrencesDesc,
        }
    }

    /// Header suffix for the Occurrences column
    pub fn indicator(self) -> &'static str {
        match self {
            SortOrder::OccurrencesDesc => " ▼",
            SortOrder::OccurrencesAsc => " ▲",
            SortOrder::Server => "",
        }
    }
}

/// Groups in display order. The sort is stable, so ties keep server order.
pub fn sorted_groups(groups: &[ErrorGroup], order: SortOrder) -> Vec<&ErrorGroup> {
    let mut rows: Vec<&ErrorGroup> = groups.iter().collect();
    match order {
        SortOrder::OccurrencesDesc => {
            rows.sort_by(|a, b| b.group_instance_count.cmp(&a.group_instance_count))
        }
        SortOrder::OccurrencesAsc => rows.sort_by_key(|group| group.group_instance_count),
        SortOrder::Server => {}
    }
    rows
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRow {
    pub sample_error: String,
    pub first_seen: String,
    pub occurrences: u64,
}

/// What the table area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupsView {
    NotSelected,
    Loading,
    Failed,
    Table(Vec<GroupRow>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    /// Label/value grid, in display order
    pub fields: Vec<(&'static str, String)>,
    pub error: String,
    pub stderr_log: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalBody {
    Loading,
    Failed,
    Detail(DetailView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub title: String,
    /// "1 of 3"
    pub position: String,
    pub can_previous: bool,
    pub can_next: bool,
    pub body: ModalBody,
}

pub fn groups_view(panel: &ClusteredErrorsPanel) -> GroupsView {
    if panel.task_template_id().is_none() {
        return GroupsView::NotSelected;
    }
    match panel.groups() {
        FetchState::Disabled => GroupsView::NotSelected,
        FetchState::Loading => GroupsView::Loading,
        FetchState::Failed(_) => GroupsView::Failed,
        FetchState::Ready(groups) => GroupsView::Table(
            sorted_groups(groups, panel.sort())
                .into_iter()
                .map(|group| GroupRow {
                    sample_error: group.sample_error.clone(),
                    first_seen: group.first_error_time.clone(),
                    occurrences: group.group_instance_count,
                })
                .collect(),
        ),
    }
}

/// Modal title; the id part is empty when nothing is selected.
pub fn modal_title(selection: &Selection) -> String {
    let id = selection
        .current_task_instance()
        .map(|id| id.to_string())
        .unwrap_or_default();
    format!("{MODAL_TITLE_PREFIX}{id}")
}

/// `None` while the modal is closed.
pub fn modal_view(panel: &ClusteredErrorsPanel) -> Option<ModalView> {
    let cursor = panel.selection().cursor()?;
    let body = match panel.detail() {
        FetchState::Loading => ModalBody::Loading,
        FetchState::Ready(detail) => ModalBody::Detail(detail_view(cursor.current(), detail)),
        FetchState::Failed(_) | FetchState::Disabled => ModalBody::Failed,
    };
    Some(ModalView {
        title: modal_title(panel.selection()),
        position: cursor.position_label(),
        can_previous: cursor.has_previous(),
        can_next: cursor.has_next(),
        body,
    })
}

pub fn detail_view(task_instance_id: u64, detail: &ErrorDetail) -> DetailView {
    DetailView {
        fields: vec![
            ("Error Time", detail.error_time.clone().unwrap_or_default()),
            ("Task ID", detail.task_id.to_string()),
            ("Task Instance ID", task_instance_id.to_string()),
            ("Task Instance Error ID", detail.task_instance_err_id.to_string()),
            ("Workflow ID", detail.workflow_id.to_string()),
            ("Workflow Run ID", detail.workflow_run_id.to_string()),
        ],
        error: detail.error.clone(),
        stderr_log: detail.task_instance_stderr_log.clone().unwrap_or_default(),
    }
}

/// First non-blank line, for one-row table cells.
pub fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

/// Unicode-width-aware truncation with ellipsis.
pub fn truncate(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for c in text.chars() {
        let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + char_width + 1 > max_width {
            break;
        }
        result.push(c);
        width += char_width;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{FetchOutcome, PanelCommand};
    use crate::query::GroupQueryKey;
    use std::time::Duration;

    fn group(sample_error: &str, count: u64, ids: Vec<u64>) -> ErrorGroup {
        ErrorGroup {
            sample_error: sample_error.to_string(),
            first_error_time: "2024-01-01T00:00:00".to_string(),
            group_instance_count: count,
            task_instance_ids: ids,
        }
    }

    fn panel_with(groups: Vec<ErrorGroup>) -> ClusteredErrorsPanel {
        let mut panel = ClusteredErrorsPanel::new(1, Duration::ZERO);
        panel.set_task_template(Some(2));
        panel.apply(FetchOutcome::Groups {
            key: GroupQueryKey {
                workflow_id: 1,
                task_template_id: 2,
            },
            result: Ok(groups),
        });
        panel
    }

    #[test]
    fn test_default_sort_is_occurrences_descending() {
        let panel = panel_with(vec![
            group("a", 1, vec![1]),
            group("b", 5, vec![2]),
            group("c", 3, vec![3]),
        ]);
        let GroupsView::Table(rows) = groups_view(&panel) else {
            panic!("expected table");
        };
        let order: Vec<&str> = rows.iter().map(|row| row.sample_error.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_row_activation_follows_display_order() {
        let mut panel = panel_with(vec![group("a", 1, vec![1]), group("b", 5, vec![50, 51])]);
        let commands = panel.select_group(0);
        assert!(matches!(
            commands.as_slice(),
            [PanelCommand::FetchDetail(key)] if key.task_instance_id == 50
        ));

        assert_eq!(panel.cycle_sort(), SortOrder::OccurrencesAsc);
        panel.select_group(0);
        assert_eq!(panel.selection().current_task_instance(), Some(1));
    }

    #[test]
    fn test_server_sort_keeps_backend_order() {
        let groups = vec![group("a", 1, vec![1]), group("b", 5, vec![2])];
        let rows = sorted_groups(&groups, SortOrder::Server);
        assert_eq!(rows[0].sample_error, "a");
        assert_eq!(SortOrder::Server.next(), SortOrder::OccurrencesDesc);
    }

    #[test]
    fn test_not_selected_view() {
        let panel = ClusteredErrorsPanel::new(1, Duration::ZERO);
        assert_eq!(groups_view(&panel), GroupsView::NotSelected);
        assert!(modal_view(&panel).is_none());
        assert_eq!(modal_title(panel.selection()), MODAL_TITLE_PREFIX);
    }

    #[test]
    fn test_modal_view_boundaries_and_failure() {
        let mut panel = panel_with(vec![group("OOM", 3, vec![11, 12, 13])]);
        let commands = panel.select_group(0);
        let Some(PanelCommand::FetchDetail(key)) = commands.first().copied() else {
            panic!("expected detail fetch");
        };

        let view = modal_view(&panel).expect("modal open");
        assert_eq!(view.title, "Error Sample for Task Instance ID: 11");
        assert_eq!(view.position, "1 of 3");
        assert!(!view.can_previous);
        assert!(view.can_next);
        assert_eq!(view.body, ModalBody::Loading);

        panel.apply(FetchOutcome::Detail {
            key,
            result: Ok(None),
        });
        assert_eq!(modal_view(&panel).map(|view| view.body), Some(ModalBody::Failed));
    }

    #[test]
    fn test_detail_view_fields() {
        let detail = ErrorDetail {
            error_time: Some("2024-01-01T00:05:00".to_string()),
            task_id: 101,
            task_instance_err_id: 9001,
            workflow_id: 1,
            workflow_run_id: 4,
            error: "MemoryError".to_string(),
            task_instance_stderr_log: None,
        };
        let view = detail_view(12, &detail);
        let labels: Vec<&str> = view.fields.iter().map(|(label, _)| *label).collect();
        assert_eq!(
            labels,
            vec![
                "Error Time",
                "Task ID",
                "Task Instance ID",
                "Task Instance Error ID",
                "Workflow ID",
                "Workflow Run ID",
            ]
        );
        assert_eq!(view.fields[2].1, "12");
        assert_eq!(view.stderr_log, "");
    }

    #[test]
    fn test_truncate_and_first_line() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
        assert_eq!(truncate("anything", 0), "");
        assert_eq!(first_line("\n  Traceback\nline two"), "Traceback");
    }
}
