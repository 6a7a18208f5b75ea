use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw timeline row associated with a client, as stored by the backend.
///
/// Rows are open records: a client may accumulate several of them over
/// time, and backends attach fields this layer does not interpret. Unknown
/// fields are captured in `extra` and carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRecord {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TimelineRecord {
    /// Recency marker used for selection: `updated_at` when present,
    /// otherwise `created_at`. `None` means the row carries no usable
    /// timestamp and must lose every recency comparison.
    pub fn effective_timestamp(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updated_at_overrides_created_at() {
        let created = "2024-01-01T00:00:00Z".parse().unwrap();
        let updated = "2024-06-01T00:00:00Z".parse().unwrap();
        let record = TimelineRecord {
            id: "r1".into(),
            client_id: "c1".into(),
            client_name: "Maria".into(),
            is_active: true,
            created_at: Some(created),
            updated_at: Some(updated),
            extra: Default::default(),
        };
        assert_eq!(record.effective_timestamp(), Some(updated));
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let raw = serde_json::json!({
            "id": "r1",
            "client_id": "c1",
            "client_name": "Maria",
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z",
            "phone": "+55 11 99999-0000",
            "tags": ["retirada"]
        });

        let record: TimelineRecord = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(record.extra["phone"], "+55 11 99999-0000");

        let back = serde_json::to_value(&record).expect("serialize");
        assert_eq!(back["tags"][0], "retirada");
    }
}
