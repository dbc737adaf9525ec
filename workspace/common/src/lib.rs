//! Common transport-layer types shared between the server, the CLI and clients.
//! These structs mirror the handlers' request/response payloads so consumers
//! can deserialize API responses without duplicating shapes.

mod analysis;

pub use analysis::{
    AnalysisMetrics, AnalysisRecordDto, AnalysisReport, ScenarioPayload, ScenarioSource,
};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by every successful handler.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    /// Wraps `data` into a successful response with the given message.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response body returned by every failing handler.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}
