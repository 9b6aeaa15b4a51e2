/*
[INPUT]:  Workflow identifier
[OUTPUT]: Workflow summary (name, status, tool, dates)
[POS]:    HTTP layer - workflow visualization routes
[UPDATE]: When adding workflow routes or changing response format
*/

use crate::http::{JobmonClient, Result};
use crate::types::{WorkflowDetails, WorkflowDetailsResponse};

impl JobmonClient {
    /// Query the workflow summary
    ///
    /// GET /workflow_details_viz/{workflow_id}
    ///
    /// The server answers with one row per workflow run; the first row is used.
    pub async fn query_workflow_details(&self, workflow_id: u64) -> Result<Option<WorkflowDetails>> {
        let route = format!("/workflow_details_viz/{}", workflow_id);
        let response: WorkflowDetailsResponse = self.get_json(&route, &[]).await?;
        Ok(response.0.into_iter().next())
    }
}
