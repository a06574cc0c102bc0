use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reference to an event-summary file kept in the organization's Drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SummaryItem {
    pub id: String,
    pub name: String,
}
