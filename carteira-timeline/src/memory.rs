use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use carteira_core::errors::{CarteiraError, Result};
use carteira_protocol::timeline::{
    Event, EventUpdate, NewEvent, NewTimeline, Timeline, TimelineRecord, TimelineUpdate,
};
use chrono::Utc;

use crate::repository::TimelineStore;

/// In-memory store used by the integration suite and local development.
/// Mirrors the Postgres semantics: hard deletes, patch updates, misses
/// reported as store errors.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    timelines: HashMap<String, Timeline>,
    events: HashMap<String, Event>,
    client_records: Vec<TimelineRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds raw client timeline rows for the `/v1/clients` surface.
    pub fn seed_client_records(&self, records: Vec<TimelineRecord>) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.client_records = records;
    }
}

#[async_trait]
impl TimelineStore for MemoryStore {
    async fn list_timelines(&self) -> Result<Vec<Timeline>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut timelines: Vec<_> = inner.timelines.values().cloned().collect();
        timelines.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(timelines)
    }

    async fn get_timeline(&self, id: &str) -> Result<Timeline> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner
            .timelines
            .get(id)
            .cloned()
            .ok_or_else(|| CarteiraError::TimelineNotFound(id.to_string()))
    }

    async fn insert_timeline(&self, new: NewTimeline) -> Result<Timeline> {
        let timeline = Timeline {
            id: new.id,
            name: new.name,
            user_id: new.user_id,
            created_at: Utc::now(),
        };

        let mut inner = self.inner.write().expect("store lock poisoned");
        inner
            .timelines
            .insert(timeline.id.clone(), timeline.clone());
        Ok(timeline)
    }

    async fn update_timeline(&self, id: &str, update: TimelineUpdate) -> Result<Timeline> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let timeline = inner
            .timelines
            .get_mut(id)
            .ok_or_else(|| CarteiraError::TimelineNotFound(id.to_string()))?;
        update.apply(timeline);
        Ok(timeline.clone())
    }

    async fn delete_timeline(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if inner.timelines.remove(id).is_none() {
            return Err(CarteiraError::TimelineNotFound(id.to_string()));
        }
        inner.events.retain(|_, event| event.timeline_id != id);
        Ok(())
    }

    async fn list_events(&self, timeline_id: &str) -> Result<Vec<Event>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut events: Vec<_> = inner
            .events
            .values()
            .filter(|event| event.timeline_id == timeline_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(events)
    }

    async fn get_event(&self, id: &str) -> Result<Event> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner
            .events
            .get(id)
            .cloned()
            .ok_or_else(|| CarteiraError::EventNotFound(id.to_string()))
    }

    async fn insert_event(&self, new: NewEvent) -> Result<Event> {
        let event = Event {
            id: new.id,
            timeline_id: new.timeline_id,
            date: new.date,
            description: new.description,
            position: new.position,
            status: new.status,
            icon: new.icon,
            icon_size: new.icon_size,
            created_at: Utc::now(),
        };

        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.events.insert(event.id.clone(), event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: &str, update: EventUpdate) -> Result<Event> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let event = inner
            .events
            .get_mut(id)
            .ok_or_else(|| CarteiraError::EventNotFound(id.to_string()))?;
        update.apply(event);
        Ok(event.clone())
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if inner.events.remove(id).is_none() {
            return Err(CarteiraError::EventNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list_client_records(&self) -> Result<Vec<TimelineRecord>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.client_records.clone())
    }
}

#[cfg(test)]
mod tests {
    use carteira_protocol::timeline::{CreateEventRequest, EventPosition, EventStatus};

    use super::*;

    fn new_timeline(name: &str) -> NewTimeline {
        NewTimeline {
            id: format!("tl-{name}"),
            name: name.to_string(),
            user_id: "user-1".to_string(),
        }
    }

    #[tokio::test]
    async fn deleting_a_timeline_drops_its_events() {
        let store = MemoryStore::new();
        let timeline = store
            .insert_timeline(new_timeline("entregas"))
            .await
            .unwrap();

        let event = CreateEventRequest {
            timeline_id: Some(timeline.id.clone()),
            date: Some("2024-01-01".into()),
            description: Some("nota".into()),
            position: Some(EventPosition::Top),
            ..Default::default()
        }
        .into_new_event()
        .unwrap();
        let event = store.insert_event(event).await.unwrap();

        store.delete_timeline(&timeline.id).await.unwrap();

        let err = store.get_event(&event.id).await.unwrap_err();
        assert!(matches!(err, CarteiraError::EventNotFound(_)));
    }

    #[tokio::test]
    async fn patch_update_keeps_unmentioned_fields() {
        let store = MemoryStore::new();
        let timeline = store
            .insert_timeline(new_timeline("entregas"))
            .await
            .unwrap();

        let event = CreateEventRequest {
            timeline_id: Some(timeline.id),
            date: Some("2024-01-01".into()),
            description: Some("nota".into()),
            position: Some(EventPosition::Top),
            ..Default::default()
        }
        .into_new_event()
        .unwrap();
        let event = store.insert_event(event).await.unwrap();

        let updated = store
            .update_event(
                &event.id,
                EventUpdate {
                    status: Some(EventStatus::Resolved),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, EventStatus::Resolved);
        assert_eq!(updated.description.as_deref(), Some("nota"));
    }
}
