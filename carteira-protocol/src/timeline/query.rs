use serde::{Deserialize, Serialize};

/// Client-facing query filters for event retrieval.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQuery {
    pub timeline_id: Option<String>,
}
