use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Named sequence of dated events belonging to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Validated payload for inserting a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTimeline {
    pub id: String,
    pub name: String,
    pub user_id: String,
}

/// Incoming create-timeline body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTimelineRequest {
    #[serde(default)]
    pub name: Option<String>,
}

impl CreateTimelineRequest {
    /// Checks required fields; the authenticated principal becomes owner.
    pub fn into_new_timeline(self, user_id: &str) -> Result<NewTimeline, Vec<&'static str>> {
        let Some(name) = self.name else {
            return Err(vec!["name"]);
        };

        Ok(NewTimeline {
            id: Uuid::new_v4().to_string(),
            name,
            user_id: user_id.to_string(),
        })
    }
}

/// Patch payload for timelines: absent fields are never touched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineUpdate {
    #[serde(default)]
    pub name: Option<String>,
}

impl TimelineUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    pub fn apply(self, timeline: &mut Timeline) {
        if let Some(name) = self.name {
            timeline.name = name;
        }
    }
}
