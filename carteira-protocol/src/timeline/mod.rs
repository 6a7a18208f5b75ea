mod event;
mod query;
mod record;
mod select;
mod timeline;

pub use event::{
    CreateEventRequest, Event, EventPosition, EventStatus, EventUpdate, NewEvent,
    DEFAULT_EVENT_ICON, DEFAULT_EVENT_ICON_SIZE, MAX_DESCRIPTION_LEN,
};
pub use query::EventQuery;
pub use record::TimelineRecord;
pub use select::group_timelines_by_client;
pub use timeline::{CreateTimelineRequest, NewTimeline, Timeline, TimelineUpdate};
