use std::fmt::{self, Display};

use chrono::{DateTime, TimeZone};
use serde_json::Value;
use tracing::debug;

use crate::client::CanvasClient;
use crate::error::ApiError;
use crate::schedule::{class_span, twice_weekly};
use crate::transport::Transport;
use crate::types::course_context;

const CALENDAR_EVENTS: &str = "api/v1/calendar_events.json";

impl<T: Transport> CanvasClient<T> {
    /// `start_at` and `end_at` are ISO 8601 timestamps.
    pub fn create_calendar_event(
        &self,
        course: impl Display,
        title: &str,
        description: &str,
        start_at: &str,
        end_at: &str,
    ) -> Result<Value, ApiError> {
        let mut req = self.post(CALENDAR_EVENTS);
        req.data_mut()
            .nest("calendar_event")
            .add("context_code", course_context(course))
            .add("title", title)
            .add("description", description)
            .add("start_at", start_at)
            .add("end_at", end_at);
        req.submit()
    }

    /// Events of a course between two `YYYY-MM-DD` dates.
    pub fn list_calendar_events_between_dates(
        &self,
        course: impl Display,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<Value>, ApiError> {
        self.get(CALENDAR_EVENTS)
            .add_param("type", "event")
            .add_param("start_date", start_date)
            .add_param("end_date", end_date)
            .add_param("context_codes[]", course_context(course))
            .submit_paginated()
    }

    pub fn list_calendar_events_all(&self, course: impl Display) -> Result<Vec<Value>, ApiError> {
        self.get(CALENDAR_EVENTS)
            .add_param("type", "event")
            .add_param("all_events", true)
            .add_param("context_codes[]", course_context(course))
            .submit_paginated()
    }

    /// Delete an event; the server returns the deleted event.
    pub fn delete_event(&self, event_id: impl Display, reason: Option<&str>) -> Result<Value, ApiError> {
        self.delete(format!("api/v1/calendar_events/{event_id}"))
            .add_param("cancel_reason", reason.unwrap_or("no reason"))
            .submit()
    }

    /// Create one event per class meeting of a twice-weekly course.
    ///
    /// `events` holds `(title, description)` pairs in meeting order; an empty
    /// title skips that meeting. `start` is the first meeting and must fall
    /// on a Monday or Tuesday.
    pub fn create_events_from_list<Tz, S>(
        &self,
        course: impl Display,
        events: &[(S, S)],
        start: DateTime<Tz>,
        length_minutes: i64,
    ) -> Result<Vec<Value>, ApiError>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
        S: AsRef<str>,
    {
        let course = course.to_string();
        let meetings = twice_weekly(start, events.len())?;
        let mut created = Vec::new();
        for ((title, description), meeting) in events.iter().zip(meetings) {
            let title = title.as_ref();
            if title.is_empty() {
                continue;
            }
            let (start_at, end_at) = class_span(&meeting, length_minutes);
            debug!(%course, title, %start_at, "creating class event");
            created.push(self.create_calendar_event(&course, title, description.as_ref(), &start_at, &end_at)?);
        }
        Ok(created)
    }
}
