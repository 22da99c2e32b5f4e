use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikePayload {
    pub job_id: Uuid,
}

/// Synchronous feedback for the caller's own toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikeResponse {
    pub liked: bool,
    pub likes_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatusResponse {
    pub likes_count: i64,
    pub user_has_liked: bool,
}
