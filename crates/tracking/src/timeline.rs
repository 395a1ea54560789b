//! Shipment timeline reconstruction.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use common::{ShipmentEventId, ShipmentId};
use serde::Serialize;
use shipment_store::{ShipmentEventRecord, ShipmentRepository};

use crate::Result;

/// Position of an entry within a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineMarker {
    /// The most recent event; there is at most one per timeline.
    Current,
    Historical,
}

/// One status event as presented to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub event_id: ShipmentEventId,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub note: Option<String>,
    pub marker: TimelineMarker,
}

impl TimelineEntry {
    /// Returns true if this is the most recent entry.
    pub fn is_current(&self) -> bool {
        self.marker == TimelineMarker::Current
    }

    /// Text to show for this entry: the note when it has content,
    /// otherwise the status code.
    pub fn label(&self) -> &str {
        match self.note.as_deref() {
            Some(note) if !note.trim().is_empty() => note,
            _ => &self.status,
        }
    }
}

/// A shipment's status history, most recent first.
///
/// Entries are sorted non-increasing by timestamp, ties broken by event ID,
/// with repeats of the same (timestamp, status, location) removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    /// Returns the ordered entries.
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// Returns the entry marked current, if the timeline is non-empty.
    pub fn current(&self) -> Option<&TimelineEntry> {
        self.entries.first()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the shipment has no recorded events.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the current entry's status, or `fallback` for an empty timeline.
    pub fn current_status<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.current().map_or(fallback, |entry| entry.status.as_str())
    }

    /// Iterates over entries, most recent first.
    pub fn iter(&self) -> std::slice::Iter<'_, TimelineEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimelineEntry;
    type IntoIter = std::slice::Iter<'a, TimelineEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builds a timeline from raw event records.
///
/// The input is left untouched. Of several events that repeat the same
/// (timestamp, status, location), the one with the lowest event ID is kept.
pub fn build_timeline(events: &[ShipmentEventRecord]) -> Timeline {
    let mut ordered: Vec<&ShipmentEventRecord> = events.iter().collect();
    ordered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(a.id.cmp(&b.id)));

    let mut seen = HashSet::with_capacity(ordered.len());
    ordered.retain(|e| seen.insert((e.timestamp, e.status.as_str(), e.location.as_str())));

    let dropped = events.len() - ordered.len();
    if dropped > 0 {
        tracing::debug!(dropped, "dropped duplicate shipment events");
        metrics::counter!("tracking_timeline_duplicates_dropped_total").increment(dropped as u64);
    }

    let entries = ordered
        .into_iter()
        .enumerate()
        .map(|(index, e)| TimelineEntry {
            event_id: e.id,
            status: e.status.clone(),
            timestamp: e.timestamp,
            location: e.location.clone(),
            note: e.note.clone(),
            marker: if index == 0 {
                TimelineMarker::Current
            } else {
                TimelineMarker::Historical
            },
        })
        .collect();

    Timeline { entries }
}

/// Fetches a shipment's events and turns them into a [`Timeline`].
pub struct TimelineBuilder<R: ShipmentRepository> {
    repository: R,
}

impl<R: ShipmentRepository> TimelineBuilder<R> {
    /// Creates a new builder reading from `repository`.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Builds the timeline for an already-resolved shipment.
    #[tracing::instrument(skip(self))]
    pub async fn build(&self, shipment_id: ShipmentId) -> Result<Timeline> {
        let events = self
            .repository
            .list_events_for_shipment(shipment_id)
            .await?;
        let timeline = build_timeline(&events);

        tracing::debug!(
            events = events.len(),
            entries = timeline.len(),
            "timeline built"
        );

        Ok(timeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shipment_store::{InMemoryShipmentStore, StoreError};
    use uuid::Uuid;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, hour, 0, 0).unwrap()
    }

    fn event(id: u128, status: &str, hour: u32, location: &str) -> ShipmentEventRecord {
        ShipmentEventRecord::builder()
            .id(ShipmentEventId::from_uuid(Uuid::from_u128(id)))
            .shipment_id(ShipmentId::from_uuid(Uuid::from_u128(999)))
            .status(status)
            .timestamp(at(hour))
            .location(location)
            .build()
    }

    fn statuses(timeline: &Timeline) -> Vec<&str> {
        timeline.iter().map(|e| e.status.as_str()).collect()
    }

    #[test]
    fn empty_history_builds_empty_timeline() {
        let timeline = build_timeline(&[]);
        assert!(timeline.is_empty());
        assert!(timeline.current().is_none());
        assert_eq!(timeline.current_status("registered"), "registered");
    }

    #[test]
    fn orders_most_recent_first() {
        let events = vec![
            event(1, "picked_up", 9, "Dar es Salaam"),
            event(2, "delivered", 15, "Arusha"),
            event(3, "in_transit", 12, "Morogoro"),
        ];

        let timeline = build_timeline(&events);
        assert_eq!(statuses(&timeline), vec!["delivered", "in_transit", "picked_up"]);
    }

    #[test]
    fn only_first_entry_is_current() {
        let events = vec![
            event(1, "picked_up", 9, "Dar es Salaam"),
            event(2, "in_transit", 12, "Morogoro"),
        ];

        let timeline = build_timeline(&events);
        assert!(timeline.entries()[0].is_current());
        assert_eq!(timeline.entries()[1].marker, TimelineMarker::Historical);
        assert_eq!(timeline.iter().filter(|e| e.is_current()).count(), 1);
        assert_eq!(timeline.current_status("registered"), "in_transit");
    }

    #[test]
    fn equal_timestamps_break_ties_by_event_id() {
        let forward = vec![
            event(7, "sorted", 10, "Hub"),
            event(3, "scanned", 10, "Hub"),
            event(5, "weighed", 10, "Hub"),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = build_timeline(&forward);
        let b = build_timeline(&reversed);

        assert_eq!(statuses(&a), vec!["scanned", "weighed", "sorted"]);
        assert_eq!(a, b);
    }

    #[test]
    fn exact_repeats_collapse_to_one_entry() {
        let events = vec![
            event(1, "picked_up", 10, "Dar es Salaam"),
            event(2, "picked_up", 10, "Dar es Salaam"),
            event(3, "in_transit", 11, "Morogoro"),
        ];

        let timeline = build_timeline(&events);
        assert_eq!(timeline.len(), 2);
        assert_eq!(statuses(&timeline), vec!["in_transit", "picked_up"]);
        assert_eq!(
            timeline.entries()[1].event_id,
            ShipmentEventId::from_uuid(Uuid::from_u128(1))
        );
    }

    #[test]
    fn same_time_different_location_is_kept() {
        let events = vec![
            event(1, "in_transit", 10, "Morogoro"),
            event(2, "in_transit", 10, "Dodoma"),
        ];

        assert_eq!(build_timeline(&events).len(), 2);
    }

    #[test]
    fn non_adjacent_repeats_are_still_removed() {
        // Same timestamp, ids interleave two distinct statuses.
        let events = vec![
            event(1, "scanned", 10, "Hub"),
            event(2, "sorted", 10, "Hub"),
            event(3, "scanned", 10, "Hub"),
        ];

        let timeline = build_timeline(&events);
        assert_eq!(statuses(&timeline), vec!["scanned", "sorted"]);
    }

    #[test]
    fn input_records_are_not_reordered() {
        let events = vec![
            event(1, "picked_up", 9, "Dar es Salaam"),
            event(2, "delivered", 15, "Arusha"),
        ];
        let before = events.clone();

        let _ = build_timeline(&events);
        assert_eq!(events, before);
    }

    #[test]
    fn label_prefers_non_blank_note() {
        let mut with_note = event(1, "in_transit", 10, "Morogoro");
        with_note.note = Some("Left sorting facility".to_string());
        let mut blank_note = event(2, "delivered", 11, "Arusha");
        blank_note.note = Some("  ".to_string());

        let timeline = build_timeline(&[with_note, blank_note]);
        assert_eq!(timeline.entries()[0].label(), "delivered");
        assert_eq!(timeline.entries()[1].label(), "Left sorting facility");
    }

    #[test]
    fn timeline_serializes_as_entry_list() {
        let timeline = build_timeline(&[event(1, "picked_up", 9, "Dar es Salaam")]);
        let json = serde_json::to_value(&timeline).unwrap();

        assert!(json.is_array());
        assert_eq!(json[0]["marker"], "current");
        assert_eq!(json[0]["status"], "picked_up");
    }

    #[tokio::test]
    async fn builder_reads_only_the_requested_shipment() {
        let store = InMemoryShipmentStore::new();
        let ours = ShipmentId::new();
        let theirs = ShipmentId::new();

        store
            .insert_events(vec![
                ShipmentEventRecord::builder()
                    .shipment_id(ours)
                    .status("picked_up")
                    .timestamp(at(9))
                    .location("Dar es Salaam")
                    .build(),
                ShipmentEventRecord::builder()
                    .shipment_id(theirs)
                    .status("delivered")
                    .timestamp(at(15))
                    .location("Arusha")
                    .build(),
            ])
            .await;

        let timeline = TimelineBuilder::new(store).build(ours).await.unwrap();
        assert_eq!(statuses(&timeline), vec!["picked_up"]);
    }

    #[tokio::test]
    async fn builder_propagates_store_failure() {
        let store = InMemoryShipmentStore::new();
        store.set_unavailable(true).await;

        let result = TimelineBuilder::new(store).build(ShipmentId::new()).await;
        assert!(matches!(
            result,
            Err(crate::TrackingError::Store(StoreError::Unavailable(_)))
        ));
    }
}
