use std::collections::BTreeMap;
use std::sync::Arc;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::warn;

use crate::domain::models::calendar::{CalendarInterval, IntervalKind};
use crate::domain::ports::IntervalRepository;

/// Effective status of a single calendar date.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    Available,
    BlockedManual,
    BookedExternal,
    BookedConfirmed,
}

impl DayStatus {
    fn from_kind(kind: IntervalKind) -> Self {
        match kind {
            IntervalKind::BookedConfirmed => DayStatus::BookedConfirmed,
            IntervalKind::BookedExternal => DayStatus::BookedExternal,
            IntervalKind::BlockedManual => DayStatus::BlockedManual,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DayStatus::Available)
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub reason: Option<String>,
    pub source: Option<String>,
}

/// Collapses overlapping intervals into one status per date over
/// `[from, to]`. When intervals overlap on a date the higher
/// `IntervalKind::rank` wins; dates covered by nothing are available.
///
/// Pure and recomputed per query, so the result always reflects the
/// latest writes.
pub fn merge_intervals(intervals: &[CalendarInterval], from: NaiveDate, to: NaiveDate) -> Vec<DayEntry> {
    let mut winners: BTreeMap<NaiveDate, (u8, &CalendarInterval, IntervalKind)> = BTreeMap::new();

    for interval in intervals {
        let Some(kind) = interval.kind() else {
            warn!("Interval {} has unknown status '{}', skipping", interval.id, interval.status);
            continue;
        };

        // Inverted ranges are treated as the single day at start_date
        // rather than silently dropped.
        let end = if interval.end_date < interval.start_date {
            interval.start_date
        } else {
            interval.end_date
        };

        let mut day = interval.start_date.max(from);
        let last = end.min(to);
        while day <= last {
            let rank = kind.rank();
            match winners.get(&day) {
                Some((existing, _, _)) if *existing >= rank => {}
                _ => {
                    winners.insert(day, (rank, interval, kind));
                }
            }
            match day.checked_add_days(Days::new(1)) {
                Some(next) => day = next,
                None => break,
            }
        }
    }

    let mut entries = Vec::new();
    let mut day = from;
    while day <= to {
        match winners.get(&day) {
            Some((_, interval, kind)) => entries.push(DayEntry {
                date: day,
                status: DayStatus::from_kind(*kind),
                reason: interval.reason.clone(),
                source: interval.source_ref.clone(),
            }),
            None => entries.push(DayEntry {
                date: day,
                status: DayStatus::Available,
                reason: None,
                source: None,
            }),
        }
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }

    entries
}

pub fn status_on(entries: &[DayEntry], date: NaiveDate) -> DayStatus {
    entries
        .iter()
        .find(|e| e.date == date)
        .map(|e| e.status)
        .unwrap_or(DayStatus::Available)
}

/// Fetches the three blocking origins independently so one unreachable
/// source degrades the timeline to the union of the rest instead of
/// failing the read. Returns the loaded intervals and a degraded flag.
pub async fn load_intervals_degraded(
    repo: &Arc<dyn IntervalRepository>,
    vehicle_id: &str,
) -> (Vec<CalendarInterval>, bool) {
    let mut intervals = Vec::new();
    let mut degraded = false;

    for kind in [
        IntervalKind::BookedConfirmed,
        IntervalKind::BookedExternal,
        IntervalKind::BlockedManual,
    ] {
        match repo.list_by_vehicle_and_status(vehicle_id, kind.as_str()).await {
            Ok(mut batch) => intervals.append(&mut batch),
            Err(e) => {
                warn!("Could not load {} intervals for vehicle {}: {:?}", kind.as_str(), vehicle_id, e);
                degraded = true;
            }
        }
    }

    (intervals, degraded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn manual(start: NaiveDate, end: NaiveDate) -> CalendarInterval {
        CalendarInterval::manual_block("veh-1".into(), start, end, Some("Maintenance".into()))
    }

    fn external(start: NaiveDate, end: NaiveDate) -> CalendarInterval {
        CalendarInterval::external_booking("veh-1".into(), "feed-1".into(), start, end, None)
    }

    fn confirmed(start: NaiveDate, end: NaiveDate) -> CalendarInterval {
        CalendarInterval::confirmed_booking("veh-1".into(), "bkg-1".into(), start, end)
    }

    #[test]
    fn test_uncovered_dates_are_available() {
        let entries = merge_intervals(&[], date(2024, 1, 1), date(2024, 1, 5));
        assert_eq!(entries.len(), 5);
        assert!(entries.iter().all(|e| e.status == DayStatus::Available));
    }

    #[test]
    fn test_every_date_has_exactly_one_status() {
        let intervals = vec![
            manual(date(2024, 1, 2), date(2024, 1, 4)),
            external(date(2024, 1, 3), date(2024, 1, 6)),
            confirmed(date(2024, 1, 4), date(2024, 1, 5)),
        ];
        let entries = merge_intervals(&intervals, date(2024, 1, 1), date(2024, 1, 7));

        assert_eq!(entries.len(), 7);
        for window in entries.windows(2) {
            assert!(window[0].date < window[1].date, "dates must be strictly ordered");
        }
    }

    #[test]
    fn test_confirmed_wins_over_every_other_origin() {
        let intervals = vec![
            manual(date(2024, 1, 10), date(2024, 1, 12)),
            external(date(2024, 1, 10), date(2024, 1, 12)),
            confirmed(date(2024, 1, 11), date(2024, 1, 11)),
        ];
        let entries = merge_intervals(&intervals, date(2024, 1, 10), date(2024, 1, 12));

        assert_eq!(entries[0].status, DayStatus::BookedExternal);
        assert_eq!(entries[1].status, DayStatus::BookedConfirmed);
        assert_eq!(entries[2].status, DayStatus::BookedExternal);
    }

    #[test]
    fn test_external_beats_manual_on_shared_date() {
        // Priority is confirmed > external > manual; a manual block under
        // an external booking must report the external booking.
        let intervals = vec![
            external(date(2024, 2, 1), date(2024, 2, 3)),
            manual(date(2024, 2, 2), date(2024, 2, 2)),
        ];
        let entries = merge_intervals(&intervals, date(2024, 2, 1), date(2024, 2, 3));

        assert_eq!(entries[1].date, date(2024, 2, 2));
        assert_eq!(entries[1].status, DayStatus::BookedExternal);
        assert_eq!(entries[1].source.as_deref(), Some("feed-1"));
    }

    #[test]
    fn test_inverted_range_collapses_to_start_day() {
        let intervals = vec![manual(date(2024, 3, 10), date(2024, 3, 1))];
        let entries = merge_intervals(&intervals, date(2024, 3, 1), date(2024, 3, 12));

        let blocked: Vec<_> = entries.iter().filter(|e| !e.status.is_available()).collect();
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].date, date(2024, 3, 10));
    }

    #[test]
    fn test_interval_clipped_to_query_window() {
        let intervals = vec![external(date(2024, 4, 1), date(2024, 4, 30))];
        let entries = merge_intervals(&intervals, date(2024, 4, 10), date(2024, 4, 12));

        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.status == DayStatus::BookedExternal));
    }

    #[test]
    fn test_status_on_defaults_to_available() {
        let entries = merge_intervals(&[], date(2024, 5, 1), date(2024, 5, 2));
        assert_eq!(status_on(&entries, date(2024, 5, 1)), DayStatus::Available);
        assert_eq!(status_on(&entries, date(2024, 6, 1)), DayStatus::Available);
    }
}
