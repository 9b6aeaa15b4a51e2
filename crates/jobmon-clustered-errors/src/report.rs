/*
[INPUT]:  Error groups, error details, workflow details
[OUTPUT]: Plain-text tables and detail listings for non-interactive commands
[POS]:    Presentation layer - stdout rendering for `list` and `show`
[UPDATE]: When changing the printed layout of the CLI commands
*/

use std::fmt::Write as _;

use jobmon_adapter::{ErrorDetail, ErrorGroup, WorkflowDetails};

use crate::view::{
    DETAIL_FAILED_MESSAGE, SortOrder, detail_view, first_line, sorted_groups, truncate,
};

const SAMPLE_ERROR_WIDTH: usize = 60;
const FIRST_SEEN_WIDTH: usize = 26;

pub fn workflow_header(workflow_id: u64, details: Option<&WorkflowDetails>) -> String {
    match details {
        Some(details) => {
            let mut header = format!("Workflow {workflow_id}: {}", details.wf_name);
            if let Some(status) = details.wf_status_desc.as_deref().or(details.wf_status.as_deref())
            {
                let _ = write!(header, " [{status}]");
            }
            if let Some(tool) = details.tool_name.as_deref() {
                let _ = write!(header, " tool={tool}");
            }
            header
        }
        None => format!("Workflow {workflow_id}"),
    }
}

/// Clustered errors as an aligned text table, most frequent first.
pub fn groups_table(groups: &[ErrorGroup]) -> String {
    if groups.is_empty() {
        return "No errors found for this task template\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<sample$}  {:<seen$}  {:>11}  {}",
        "Sample Error",
        "First Seen",
        "Occurrences",
        "Task Instances",
        sample = SAMPLE_ERROR_WIDTH,
        seen = FIRST_SEEN_WIDTH,
    );
    for group in sorted_groups(groups, SortOrder::default()) {
        let ids = group
            .task_instance_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(
            out,
            "{}  {}  {:>11}  {}",
            pad(&truncate(first_line(&group.sample_error), SAMPLE_ERROR_WIDTH), SAMPLE_ERROR_WIDTH),
            pad(&group.first_error_time, FIRST_SEEN_WIDTH),
            group.group_instance_count,
            ids,
        );
    }
    out
}

/// One sample, or the failure message when the server had no record.
pub fn detail_listing(task_instance_id: u64, detail: Option<&ErrorDetail>) -> String {
    let Some(detail) = detail else {
        return format!("{DETAIL_FAILED_MESSAGE}\n");
    };
    let view = detail_view(task_instance_id, detail);
    let label_width = view
        .fields
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (label, value) in &view.fields {
        let _ = writeln!(out, "{label:<label_width$}  {value}");
    }
    let _ = writeln!(out, "\nError:\n{}", view.error);
    if !view.stderr_log.is_empty() {
        let _ = writeln!(out, "\nStderr log:\n{}", view.stderr_log);
    }
    out
}

fn pad(text: &str, width: usize) -> String {
    let used = unicode_width::UnicodeWidthStr::width(text);
    format!("{text}{}", " ".repeat(width.saturating_sub(used)))
}
