use std::collections::HashSet;
use chrono::{Days, NaiveDate};
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};
use tracing::debug;

use crate::domain::models::calendar::{CalendarInterval, IntervalKind};
use crate::domain::models::vehicle::Vehicle;

/// One VEVENT reduced to day granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEvent {
    pub uid: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: Option<String>,
}

#[derive(Default)]
struct PendingEvent {
    uid: Option<String>,
    dtstart: Option<(NaiveDate, bool)>,
    dtend: Option<(NaiveDate, bool)>,
    summary: Option<String>,
}

/// Parses raw iCal text into booking events.
///
/// Line-oriented and tolerant: unknown properties are ignored and a
/// malformed VEVENT is skipped without failing the feed. An event is
/// emitted only when it carries a UID and both boundary stamps resolve.
/// Duplicate UIDs within one feed keep the first occurrence.
pub fn parse_feed(raw: &str) -> Vec<FeedEvent> {
    let mut events = Vec::new();
    let mut seen_uids: HashSet<String> = HashSet::new();

    let mut current: Option<PendingEvent> = None;
    // VALARM and friends nest inside VEVENT; their properties must not
    // leak into the event being collected.
    let mut nested_depth = 0usize;

    for line in unfold_lines(raw) {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("BEGIN:VEVENT") {
            current = Some(PendingEvent::default());
            nested_depth = 0;
            continue;
        }

        if line.eq_ignore_ascii_case("END:VEVENT") {
            if let Some(pending) = current.take() {
                match finalize_event(pending) {
                    Some(event) => {
                        if seen_uids.insert(event.uid.clone()) {
                            events.push(event);
                        } else {
                            debug!("Skipping duplicate UID in feed: {}", event.uid);
                        }
                    }
                    None => debug!("Skipping VEVENT with unresolved UID or boundary dates"),
                }
            }
            continue;
        }

        let Some(pending) = current.as_mut() else { continue };

        if let Some(component) = line.strip_prefix("BEGIN:").or_else(|| line.strip_prefix("begin:")) {
            debug!("Entering nested component {}", component);
            nested_depth += 1;
            continue;
        }
        if line.to_ascii_uppercase().starts_with("END:") {
            nested_depth = nested_depth.saturating_sub(1);
            continue;
        }
        if nested_depth > 0 {
            continue;
        }

        let Some((name, value)) = split_property(line) else { continue };

        match name.as_str() {
            "UID" => pending.uid = Some(value.trim().to_string()),
            "DTSTART" => pending.dtstart = parse_stamp(value),
            "DTEND" => pending.dtend = parse_stamp(value),
            "SUMMARY" => pending.summary = Some(value.trim().to_string()),
            _ => {}
        }
    }

    events
}

/// RFC 5545 line unfolding: a line starting with a space or tab continues
/// the previous one.
fn unfold_lines(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for line in raw.lines() {
        let line = line.trim_end_matches('\r');
        if (line.starts_with(' ') || line.starts_with('\t')) && !out.is_empty() {
            let idx = out.len() - 1;
            out[idx].push_str(&line[1..]);
        } else {
            out.push(line.to_string());
        }
    }
    out
}

/// Splits `NAME;PARAM=X:value` into (uppercased name, value). Parameters
/// between the name and the first colon are dropped.
fn split_property(line: &str) -> Option<(String, &str)> {
    let colon = line.find(':')?;
    let (head, value) = (&line[..colon], &line[colon + 1..]);
    let name = head.split(';').next().unwrap_or(head);
    Some((name.trim().to_ascii_uppercase(), value))
}

/// Resolves a boundary stamp to (day, had_time_component).
///
/// Accepts whole-day stamps (`YYYYMMDD`) and date-times
/// (`YYYYMMDDTHHMMSS[Z]`); any time component is truncated to the
/// containing day.
fn parse_stamp(value: &str) -> Option<(NaiveDate, bool)> {
    let value = value.trim();
    if value.len() < 8 {
        return None;
    }
    let day = NaiveDate::parse_from_str(&value[..8], "%Y%m%d").ok()?;
    let has_time = value.len() > 8 && value.as_bytes()[8] == b'T';
    Some((day, has_time))
}

fn finalize_event(pending: PendingEvent) -> Option<FeedEvent> {
    let uid = pending.uid.filter(|u| !u.is_empty())?;
    let (start_date, _) = pending.dtstart?;
    let (raw_end, end_had_time) = pending.dtend?;

    // A date-valued DTEND is exclusive per RFC 5545; step it back onto the
    // last occupied day. A datetime DTEND already truncated to its own day.
    let mut end_date = if !end_had_time && raw_end > start_date {
        raw_end.checked_sub_days(Days::new(1)).unwrap_or(raw_end)
    } else {
        raw_end
    };
    if end_date < start_date {
        end_date = start_date;
    }

    Some(FeedEvent {
        uid,
        start_date,
        end_date,
        summary: pending.summary.filter(|s| !s.is_empty()),
    })
}

/// Renders a vehicle's confirmed bookings as an iCal calendar, so
/// companies can subscribe platform bookings into their own tools.
pub fn export_feed(vehicle: &Vehicle, intervals: &[CalendarInterval]) -> String {
    let mut calendar = Calendar::new();
    calendar.name(&format!("{} bookings", vehicle.name));

    for interval in intervals {
        if interval.kind() != Some(IntervalKind::BookedConfirmed) {
            continue;
        }
        // DTEND is exclusive for all-day events.
        let feed_end = interval
            .end_date
            .checked_add_days(Days::new(1))
            .unwrap_or(interval.end_date);

        let event = IcalEvent::new()
            .summary(interval.reason.as_deref().unwrap_or("Booked"))
            .starts(interval.start_date)
            .ends(feed_end)
            .uid(&interval.id)
            .done();
        calendar.push(event);
    }

    calendar.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parses_whole_day_and_datetime_stamps() {
        let raw = "BEGIN:VCALENDAR\r\n\
                   BEGIN:VEVENT\r\n\
                   UID:evt-1\r\n\
                   DTSTART;VALUE=DATE:20240201\r\n\
                   DTEND;VALUE=DATE:20240204\r\n\
                   SUMMARY:Reserved\r\n\
                   END:VEVENT\r\n\
                   BEGIN:VEVENT\r\n\
                   UID:evt-2\r\n\
                   DTSTART:20240310T140000Z\r\n\
                   DTEND:20240312T100000Z\r\n\
                   END:VEVENT\r\n\
                   END:VCALENDAR\r\n";

        let events = parse_feed(raw);
        assert_eq!(events.len(), 2);

        // Date-valued DTEND is exclusive: 01..04 occupies 01..03.
        assert_eq!(events[0].uid, "evt-1");
        assert_eq!(events[0].start_date, date(2024, 2, 1));
        assert_eq!(events[0].end_date, date(2024, 2, 3));
        assert_eq!(events[0].summary.as_deref(), Some("Reserved"));

        // Datetime stamps truncate to their containing day.
        assert_eq!(events[1].start_date, date(2024, 3, 10));
        assert_eq!(events[1].end_date, date(2024, 3, 12));
        assert_eq!(events[1].summary, None);
    }

    #[test]
    fn test_malformed_event_is_skipped_not_fatal() {
        let raw = "BEGIN:VEVENT\n\
                   UID:good\n\
                   DTSTART;VALUE=DATE:20240601\n\
                   DTEND;VALUE=DATE:20240602\n\
                   END:VEVENT\n\
                   BEGIN:VEVENT\n\
                   UID:no-dates\n\
                   SUMMARY:Broken\n\
                   END:VEVENT\n\
                   BEGIN:VEVENT\n\
                   DTSTART;VALUE=DATE:20240610\n\
                   DTEND;VALUE=DATE:20240611\n\
                   END:VEVENT\n\
                   BEGIN:VEVENT\n\
                   UID:bad-stamp\n\
                   DTSTART:tomorrow\n\
                   DTEND;VALUE=DATE:20240620\n\
                   END:VEVENT\n";

        let events = parse_feed(raw);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].uid, "good");
        assert_eq!(events[0].end_date, date(2024, 6, 1));
    }

    #[test]
    fn test_unknown_properties_and_folded_lines_are_tolerated() {
        let raw = "BEGIN:VEVENT\n\
                   UID:folded\n\
                   X-CUSTOM-PROP;LANG=en:whatever\n\
                   SUMMARY:Long boo\n king title\n\
                   DTSTART;VALUE=DATE:20240701\n\
                   DTEND;VALUE=DATE:20240703\n\
                   END:VEVENT\n";

        let events = parse_feed(raw);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary.as_deref(), Some("Long booking title"));
    }

    #[test]
    fn test_nested_alarm_does_not_leak_properties() {
        let raw = "BEGIN:VEVENT\n\
                   UID:with-alarm\n\
                   SUMMARY:Rental\n\
                   DTSTART;VALUE=DATE:20240801\n\
                   DTEND;VALUE=DATE:20240802\n\
                   BEGIN:VALARM\n\
                   SUMMARY:Ping\n\
                   TRIGGER:-PT15M\n\
                   END:VALARM\n\
                   END:VEVENT\n";

        let events = parse_feed(raw);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary.as_deref(), Some("Rental"));
    }

    #[test]
    fn test_duplicate_uid_keeps_first() {
        let raw = "BEGIN:VEVENT\n\
                   UID:dup\n\
                   DTSTART;VALUE=DATE:20240901\n\
                   DTEND;VALUE=DATE:20240902\n\
                   END:VEVENT\n\
                   BEGIN:VEVENT\n\
                   UID:dup\n\
                   DTSTART;VALUE=DATE:20240910\n\
                   DTEND;VALUE=DATE:20240911\n\
                   END:VEVENT\n";

        let events = parse_feed(raw);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start_date, date(2024, 9, 1));
    }

    #[test]
    fn test_reparse_is_idempotent() {
        let raw = "BEGIN:VEVENT\n\
                   UID:stable\n\
                   DTSTART;VALUE=DATE:20241001\n\
                   DTEND;VALUE=DATE:20241005\n\
                   END:VEVENT\n";

        assert_eq!(parse_feed(raw), parse_feed(raw));
    }

    #[test]
    fn test_single_day_event_without_time() {
        let raw = "BEGIN:VEVENT\n\
                   UID:one-day\n\
                   DTSTART;VALUE=DATE:20241101\n\
                   DTEND;VALUE=DATE:20241101\n\
                   END:VEVENT\n";

        let events = parse_feed(raw);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start_date, events[0].end_date);
    }
}
