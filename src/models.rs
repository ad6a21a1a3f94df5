use crate::pagination::PaginationMeta;
use serde::Serialize;
use utoipa::ToSchema;

/// Body of a list response. `pagination` is present exactly when pagination
/// is enabled for the route.
#[derive(Serialize)]
pub struct ListResponse<D> {
    pub data: Vec<D>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

/// Body of a successful delete.
#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    pub id: String,
}

impl DeleteResponse {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            success: true,
            message: "Document deleted successfully".to_string(),
            id: id.into(),
        }
    }
}
