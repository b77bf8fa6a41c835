use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::state::AppState;
use crate::domain::models::calendar::CalendarInterval;
use crate::domain::models::feed::CalendarFeed;
use crate::domain::services::ical::parse_feed;
use crate::error::AppError;

/// Periodic resync of linked external calendars. Feeds are processed
/// one at a time, so a single feed never overlaps its own resync.
pub async fn start_feed_sync_worker(state: Arc<AppState>) {
    info!("Starting feed sync worker...");

    let interval = Duration::from_secs(state.config.feed_sync_interval_secs.max(1));

    loop {
        let cutoff = Utc::now() - chrono::Duration::seconds(state.config.feed_sync_interval_secs as i64);

        match state.feed_repo.list_due(cutoff).await {
            Ok(feeds) => {
                for feed in feeds {
                    let span = info_span!(
                        "feed_sync",
                        feed_id = %feed.id,
                        vehicle_id = %feed.vehicle_id
                    );

                    let state = state.clone();
                    async move {
                        match sync_feed_once(&state, &feed).await {
                            Ok(count) => info!("Feed sync completed, {} events imported", count),
                            Err(e) => error!("Feed sync failed: {:?}", e),
                        }
                    }
                        .instrument(span)
                        .await;
                }
            }
            Err(e) => error!("Failed to list due feeds: {:?}", e),
        }
        sleep(interval).await;
    }
}

/// Fetches, parses and stores one feed. The stored set is replaced, not
/// merged, so events cancelled upstream drop off the timeline. Fetch
/// and sync outcomes are recorded on the feed row either way.
pub async fn sync_feed_once(state: &Arc<AppState>, feed: &CalendarFeed) -> Result<usize, AppError> {
    let raw = match state.feed_source.fetch(&feed.url).await {
        Ok(raw) => raw,
        Err(e) => {
            state.feed_repo.record_sync(&feed.id, Utc::now(), Some(e.to_string())).await?;
            return Err(e);
        }
    };

    let events = parse_feed(&raw);
    let intervals: Vec<CalendarInterval> = events
        .into_iter()
        .map(|event| CalendarInterval::external_booking(
            feed.vehicle_id.clone(),
            feed.id.clone(),
            event.start_date,
            event.end_date,
            event.summary,
        ))
        .collect();

    let imported = state.interval_repo.replace_for_feed(&feed.id, &intervals).await?;
    state.feed_repo.record_sync(&feed.id, Utc::now(), None).await?;

    Ok(imported)
}
