/*
[INPUT]:  Jobmon error-log and workflow schema definitions
[OUTPUT]: Typed Rust model structs with serialization support
[POS]:    Data layer - domain models returned by the Jobmon service
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// A cluster of task-instance errors that share a similar message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorGroup {
    /// Representative error message for the cluster
    pub sample_error: String,
    /// Raw timestamp of the earliest error in the cluster, as sent by the server
    pub first_error_time: String,
    /// Number of task-instance errors in the cluster
    pub group_instance_count: u64,
    /// Task instances belonging to the cluster, in server order
    #[serde(default)]
    pub task_instance_ids: Vec<u64>,
}

/// Full record for a single task-instance error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub error_time: Option<String>,
    pub task_id: u64,
    pub task_instance_err_id: u64,
    pub workflow_id: u64,
    pub workflow_run_id: u64,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub task_instance_stderr_log: Option<String>,
}

/// Summary of a workflow as reported by `workflow_details_viz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDetails {
    pub wf_name: String,
    #[serde(default)]
    pub wf_args: Option<String>,
    #[serde(default)]
    pub wf_created_date: Option<String>,
    #[serde(default)]
    pub wf_status_date: Option<String>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub wf_status: Option<String>,
    #[serde(default)]
    pub wf_status_desc: Option<String>,
    #[serde(default)]
    pub wfr_jobmon_version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_accepts_null_columns() {
        let raw = r#"{
            "error_time": null,
            "task_id": 7,
            "task_instance_err_id": 70,
            "workflow_id": 1,
            "workflow_run_id": 3,
            "error": "Killed",
            "task_instance_stderr_log": null
        }"#;
        let detail: ErrorDetail = serde_json::from_str(raw).expect("decode detail");
        assert_eq!(detail.error_time, None);
        assert_eq!(detail.task_instance_stderr_log, None);
        assert_eq!(detail.error, "Killed");
    }

    #[test]
    fn test_error_group_ignores_unknown_fields() {
        let raw = r#"{
            "sample_error": "MemoryError",
            "first_error_time": "2024-01-01T00:00:00",
            "group_instance_count": 2,
            "task_instance_ids": [5, 9],
            "error_score": 0.93
        }"#;
        let group: ErrorGroup = serde_json::from_str(raw).expect("decode group");
        assert_eq!(group.task_instance_ids, vec![5, 9]);
        assert_eq!(group.group_instance_count, 2);
    }
}
