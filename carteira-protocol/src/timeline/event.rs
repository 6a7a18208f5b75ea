use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Icon applied to events created without one.
pub const DEFAULT_EVENT_ICON: &str = "💬";
/// Icon size applied to events created without one.
pub const DEFAULT_EVENT_ICON_SIZE: &str = "text-base";
/// Upper bound accepted for event descriptions.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Which side of the timeline the event is rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPosition {
    Top,
    Bottom,
}

impl EventPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventPosition::Top => "top",
            EventPosition::Bottom => "bottom",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "top" => Some(EventPosition::Top),
            "bottom" => Some(EventPosition::Bottom),
            _ => None,
        }
    }
}

/// Resolution state of an event. `Pending` is the legacy default applied
/// on create when the caller omits a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Created,
    Resolved,
    NoResponse,
    Pending,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Created => "created",
            EventStatus::Resolved => "resolved",
            EventStatus::NoResponse => "no_response",
            EventStatus::Pending => "pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "created" => Some(EventStatus::Created),
            "resolved" => Some(EventStatus::Resolved),
            "no_response" => Some(EventStatus::NoResponse),
            "pending" => Some(EventStatus::Pending),
            _ => None,
        }
    }
}

/// Dated entry inside a timeline, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub timeline_id: String,
    pub date: String,
    pub description: Option<String>,
    pub position: EventPosition,
    pub status: EventStatus,
    pub icon: String,
    pub icon_size: String,
    pub created_at: DateTime<Utc>,
}

/// Validated payload for inserting an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub id: String,
    pub timeline_id: String,
    pub date: String,
    pub description: Option<String>,
    pub position: EventPosition,
    pub status: EventStatus,
    pub icon: String,
    pub icon_size: String,
}

/// Incoming create-event body. Every required field is optional here so
/// validation can name all the missing ones at once.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub timeline_id: Option<String>,
    #[serde(default, alias = "event_date")]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub position: Option<EventPosition>,
    #[serde(default)]
    pub status: Option<EventStatus>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub icon_size: Option<String>,
}

impl CreateEventRequest {
    /// Checks required fields and applies create-time defaults.
    pub fn into_new_event(self) -> Result<NewEvent, Vec<&'static str>> {
        let mut missing = Vec::new();
        if self.timeline_id.is_none() {
            missing.push("timeline_id");
        }
        if self.date.is_none() {
            missing.push("date");
        }
        if self.description.is_none() {
            missing.push("description");
        }
        if self.position.is_none() {
            missing.push("position");
        }
        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(NewEvent {
            id: Uuid::new_v4().to_string(),
            timeline_id: self.timeline_id.unwrap(),
            date: self.date.unwrap(),
            description: self.description,
            position: self.position.unwrap(),
            status: self.status.unwrap_or(EventStatus::Pending),
            icon: self.icon.unwrap_or_else(|| DEFAULT_EVENT_ICON.to_string()),
            icon_size: self
                .icon_size
                .unwrap_or_else(|| DEFAULT_EVENT_ICON_SIZE.to_string()),
        })
    }
}

/// Patch payload for events: only fields present in the request body are
/// applied, so an omitted field never clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventUpdate {
    #[serde(default, alias = "event_date")]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub position: Option<EventPosition>,
    #[serde(default)]
    pub status: Option<EventStatus>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub icon_size: Option<String>,
}

impl EventUpdate {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.description.is_none()
            && self.position.is_none()
            && self.status.is_none()
            && self.icon.is_none()
            && self.icon_size.is_none()
    }

    /// Applies the supplied fields over an existing event.
    pub fn apply(self, event: &mut Event) {
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(description) = self.description {
            event.description = Some(description);
        }
        if let Some(position) = self.position {
            event.position = position;
        }
        if let Some(status) = self.status {
            event.status = status;
        }
        if let Some(icon) = self.icon {
            event.icon = icon;
        }
        if let Some(icon_size) = self.icon_size {
            event.icon_size = icon_size;
        }
    }
}
