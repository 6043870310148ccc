//! Derived views over the events collection - calendar grouping and type
//! filtering. Pure transforms; the reference date is an argument so tests
//! can pin the clock.

use crate::{
    backend::EventRecord,
    core::format::format_date,
    entities::event::EventType,
};
use chrono::{Days, NaiveDate};

/// One calendar day's worth of events, ready for a section list.
#[derive(Debug)]
pub struct DayGroup<'a> {
    /// "Today", "Tomorrow", or the formatted date
    pub label: String,
    /// The calendar date the bucket covers
    pub date: NaiveDate,
    /// Events on that date, in input (newest-first) order
    pub events: Vec<&'a EventRecord>,
}

/// Buckets events by the calendar date of `created_at`, labeling today's and
/// tomorrow's buckets specially. Buckets appear in first-encounter order, so
/// a newest-first input yields newest-first groups.
#[must_use]
pub fn group_by_day(events: &[EventRecord], today: NaiveDate) -> Vec<DayGroup<'_>> {
    let tomorrow = today.checked_add_days(Days::new(1));
    let mut groups: Vec<DayGroup<'_>> = Vec::new();

    for record in events {
        let date = record.event.created_at.date_naive();
        if let Some(group) = groups.iter_mut().find(|g| g.date == date) {
            group.events.push(record);
            continue;
        }

        let label = if date == today {
            "Today".to_string()
        } else if Some(date) == tomorrow {
            "Tomorrow".to_string()
        } else {
            format_date(date)
        };
        groups.push(DayGroup {
            label,
            date,
            events: vec![record],
        });
    }

    groups
}

/// Filter applied by the notifications screen's tab bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    /// The "all" sentinel: no filtering
    #[default]
    All,
    /// Exact match on one event type
    Type(EventType),
}

/// Narrows events to those matching the filter, preserving order.
#[must_use]
pub fn filter_by_type(events: &[EventRecord], filter: EventFilter) -> Vec<&EventRecord> {
    events
        .iter()
        .filter(|record| match filter {
            EventFilter::All => true,
            EventFilter::Type(wanted) => record.event.event_type == wanted,
        })
        .collect()
}
