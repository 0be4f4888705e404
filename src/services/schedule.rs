//! Day-grouped agenda for the events page.

use chrono::{Datelike, Month, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Event;

/// Events keyed by calendar day; iteration order is ascending by day
pub type Agenda = BTreeMap<NaiveDate, Vec<Event>>;

/// Number of months listed by [`upcoming_months`] on the events page
pub const UPCOMING_MONTHS_LIMIT: usize = 3;

/// Groups events into day buckets ordered by date, each bucket ordered by time of day.
///
/// Sorting is stable: events on the same day and time keep their input order.
/// Events whose time does not parse stay in their slot within the bucket and the
/// timed events are sorted around them. No event is dropped or duplicated.
pub fn group_by_day(mut events: Vec<Event>) -> Agenda {
    events.sort_by_key(|e| e.date);

    let mut agenda = Agenda::new();
    for event in events {
        agenda.entry(event.date).or_default().push(event);
    }

    for bucket in agenda.values_mut() {
        order_by_time(bucket);
    }

    agenda
}

fn order_by_time(bucket: &mut Vec<Event>) {
    let mut timed: Vec<(u16, Event)> = Vec::with_capacity(bucket.len());
    let mut slots: Vec<Option<Event>> = Vec::with_capacity(bucket.len());

    for event in bucket.drain(..) {
        match event.minutes_of_day() {
            Some(minutes) => {
                timed.push((minutes, event));
                slots.push(None);
            }
            None => {
                tracing::debug!(event_id = event.id, time = %event.time, "Unparseable event time");
                slots.push(Some(event));
            }
        }
    }

    timed.sort_by_key(|(minutes, _)| *minutes);
    let mut timed = timed.into_iter().map(|(_, event)| event);

    bucket.extend(slots.into_iter().filter_map(|slot| slot.or_else(|| timed.next())));
}

/// A calendar month that still has events coming up
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpcomingMonth {
    pub year: i32,
    pub month: u32,
    pub name: &'static str,
}

/// Distinct months, soonest first, of events dated on or after `today`.
pub fn upcoming_months(events: &[Event], today: NaiveDate, limit: usize) -> Vec<UpcomingMonth> {
    let mut dates: Vec<NaiveDate> = events
        .iter()
        .map(|e| e.date)
        .filter(|date| *date >= today)
        .collect();
    dates.sort();

    let mut months: Vec<UpcomingMonth> = Vec::new();
    for date in dates {
        if months.len() == limit {
            break;
        }
        let seen = months
            .last()
            .is_some_and(|m| m.year == date.year() && m.month == date.month());
        if seen {
            continue;
        }
        let name = u8::try_from(date.month())
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown");
        months.push(UpcomingMonth {
            year: date.year(),
            month: date.month(),
            name,
        });
    }

    months
}
