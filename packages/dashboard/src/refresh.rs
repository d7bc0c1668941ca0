//! Timer-driven refresh cycle.
//!
//! A [`Presenter`] owns the injected report source and coordinate
//! normalizer. Each tick of [`Presenter::run`] fetches, rebuilds the
//! snapshot and swaps it into the [`SnapshotStore`] in a single write, so
//! readers always see a whole snapshot. Cycles never overlap: the cycle
//! counter lives behind an async mutex that is held for the whole cycle.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use webgis_dashboard_models::RenderSnapshot;
use webgis_source::ReportSource;

use crate::presenter::{Normalizer, RenderSettings, build_snapshot, empty_snapshot};

/// Whether a refresh cycle is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    /// Waiting for the next tick.
    Idle,
    /// Fetching and rebuilding the snapshot.
    Refreshing,
}

/// A snapshot as published to the display surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedSnapshot {
    /// Number of the cycle that produced this snapshot. `0` before the first
    /// cycle completes.
    pub cycle: u64,
    /// When the cycle completed. `None` before the first cycle.
    pub refreshed_at: Option<DateTime<Utc>>,
    /// The snapshot itself.
    pub snapshot: RenderSnapshot,
}

/// Holds the current snapshot. Written only by the refresh cycle.
#[derive(Debug)]
pub struct SnapshotStore {
    current: RwLock<Arc<PublishedSnapshot>>,
}

impl SnapshotStore {
    /// Creates a store holding `initial` as cycle `0`.
    #[must_use]
    pub fn new(initial: RenderSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(PublishedSnapshot {
                cycle: 0,
                refreshed_at: None,
                snapshot: initial,
            })),
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<PublishedSnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replaces the current snapshot.
    pub fn publish(&self, published: PublishedSnapshot) -> Arc<PublishedSnapshot> {
        let published = Arc::new(published);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&published);
        published
    }
}

/// Drives fetch, snapshot assembly and publication.
pub struct Presenter {
    source: Arc<dyn ReportSource>,
    normalize: Normalizer,
    settings: RenderSettings,
    store: Arc<SnapshotStore>,
    cycles: Mutex<u64>,
}

impl Presenter {
    /// Creates a presenter publishing into a new store seeded with the
    /// empty snapshot.
    #[must_use]
    pub fn new(
        source: Arc<dyn ReportSource>,
        normalize: Normalizer,
        settings: RenderSettings,
    ) -> Self {
        let store = Arc::new(SnapshotStore::new(empty_snapshot(&settings)));
        Self {
            source,
            normalize,
            settings,
            store,
            cycles: Mutex::new(0),
        }
    }

    /// The store this presenter publishes into.
    #[must_use]
    pub fn store(&self) -> Arc<SnapshotStore> {
        Arc::clone(&self.store)
    }

    /// Whether a cycle is currently running.
    #[must_use]
    pub fn state(&self) -> RefreshState {
        if self.cycles.try_lock().is_ok() {
            RefreshState::Idle
        } else {
            RefreshState::Refreshing
        }
    }

    /// Runs one refresh cycle and returns what it published.
    ///
    /// A failed fetch publishes the empty snapshot; this never fails.
    pub async fn refresh(&self) -> Arc<PublishedSnapshot> {
        let mut cycles = self.cycles.lock().await;
        *cycles += 1;
        let cycle = *cycles;

        log::debug!("Refresh cycle {cycle} started");
        let table = self.source.fetch_or_empty().await;
        let snapshot = build_snapshot(table, &self.settings, self.normalize);

        log::info!(
            "Refresh cycle {cycle}: {} reports, {} markers",
            snapshot.table.len(),
            snapshot.markers().count()
        );

        self.store.publish(PublishedSnapshot {
            cycle,
            refreshed_at: Some(Utc::now()),
            snapshot,
        })
    }

    /// Refreshes once immediately and then every `period`, forever.
    ///
    /// Each cycle runs to completion before the next tick is awaited. Ticks
    /// missed while a slow fetch is running are delayed, not bursted.
    pub async fn run(self: Arc<Self>, period: Duration) {
        log::info!("Refreshing every {period:?} from {}", self.source.id());
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.refresh().await;
        }
    }
}
