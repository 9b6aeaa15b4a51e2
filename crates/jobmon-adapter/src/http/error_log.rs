/*
[INPUT]:  Workflow, task template, and task instance identifiers
[OUTPUT]: Clustered error groups and single error-instance details
[POS]:    HTTP layer - error log visualization routes
[UPDATE]: When adding error-log routes or changing response format
*/

use tracing::debug;

use crate::http::{JobmonClient, Result};
use crate::types::{ErrorDetail, ErrorDetailResponse, ErrorGroup, ErrorGroupsResponse};

impl JobmonClient {
    /// Query clustered error groups for a task template
    ///
    /// GET /error_log_viz/{workflow_id}/{task_template_id}?cluster_errors=true
    pub async fn query_error_groups(
        &self,
        workflow_id: u64,
        task_template_id: u64,
    ) -> Result<Vec<ErrorGroup>> {
        let route = format!("/error_log_viz/{}/{}", workflow_id, task_template_id);
        let response: ErrorGroupsResponse = self
            .get_json(&route, &[("cluster_errors", "true")])
            .await?;
        debug!(
            workflow_id,
            task_template_id,
            groups = response.error_logs.len(),
            "clustered errors received"
        );
        Ok(response.error_logs)
    }

    /// Query the detail record for one task instance's error
    ///
    /// GET /error_log_viz/{workflow_id}/{task_template_id}/{task_instance_id}
    ///
    /// Only the first record is meaningful; `None` when the server sent none.
    pub async fn query_error_detail(
        &self,
        workflow_id: u64,
        task_template_id: u64,
        task_instance_id: u64,
    ) -> Result<Option<ErrorDetail>> {
        let route = format!(
            "/error_log_viz/{}/{}/{}",
            workflow_id, task_template_id, task_instance_id
        );
        let response: ErrorDetailResponse = self.get_json(&route, &[]).await?;
        Ok(response.error_logs.into_iter().next())
    }
}
