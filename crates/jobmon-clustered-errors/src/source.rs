/*
[INPUT]:  Workflow/template/task-instance identifiers
[OUTPUT]: Error groups and error details from any backing source
[POS]:    Data access seam between the panel runtime and the HTTP adapter
[UPDATE]: When the panel needs a new kind of remote data
*/

use async_trait::async_trait;
use jobmon_adapter::{ErrorDetail, ErrorGroup, JobmonClient, JobmonError, WorkflowDetails};

/// Remote data the clustered errors panel consumes.
#[async_trait]
pub trait ErrorLogSource: Send + Sync {
    async fn error_groups(
        &self,
        workflow_id: u64,
        task_template_id: u64,
    ) -> Result<Vec<ErrorGroup>, JobmonError>;

    /// `Ok(None)` when the server answered with no record.
    async fn error_detail(
        &self,
        workflow_id: u64,
        task_template_id: u64,
        task_instance_id: u64,
    ) -> Result<Option<ErrorDetail>, JobmonError>;

    async fn workflow_details(
        &self,
        workflow_id: u64,
    ) -> Result<Option<WorkflowDetails>, JobmonError>;
}

#[async_trait]
impl ErrorLogSource for JobmonClient {
    async fn error_groups(
        &self,
        workflow_id: u64,
        task_template_id: u64,
    ) -> Result<Vec<ErrorGroup>, JobmonError> {
        self.query_error_groups(workflow_id, task_template_id).await
    }

    async fn error_detail(
        &self,
        workflow_id: u64,
        task_template_id: u64,
        task_instance_id: u64,
    ) -> Result<Option<ErrorDetail>, JobmonError> {
        self.query_error_detail(workflow_id, task_template_id, task_instance_id)
            .await
    }

    async fn workflow_details(
        &self,
        workflow_id: u64,
    ) -> Result<Option<WorkflowDetails>, JobmonError> {
        self.query_workflow_details(workflow_id).await
    }
}
