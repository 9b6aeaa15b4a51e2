/*
[INPUT]:  Jobmon response envelopes and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::models::{ErrorDetail, ErrorGroup, WorkflowDetails};

/// Envelope returned by every `error_log_viz` route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ErrorLogResponse<T> {
    #[serde(default)]
    pub error_logs: Vec<T>,
}

pub type ErrorGroupsResponse = ErrorLogResponse<ErrorGroup>;

pub type ErrorDetailResponse = ErrorLogResponse<ErrorDetail>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowDetailsResponse(pub Vec<WorkflowDetails>);
