pub mod timeline;

pub mod prelude {
    pub use crate::timeline::{
        group_timelines_by_client, CreateEventRequest, CreateTimelineRequest, Event, EventPosition,
        EventQuery, EventStatus, EventUpdate, NewEvent, NewTimeline, Timeline, TimelineRecord,
        TimelineUpdate,
    };
}
