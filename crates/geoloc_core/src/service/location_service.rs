//! Location use-case facade.
//!
//! # Responsibility
//! - Compose store, filter-sort engine and aggregators into the
//!   operations consumed by presentation code.
//! - Own the session criteria (`filter`, `sort`) read by [`LocationService::query`].
//!
//! # Invariants
//! - The facade is the only mutator of its store.
//! - Stored criteria are always normalized.
//! - Stats aggregate the full, unfiltered population.
//! - Errors are surfaced unchanged; nothing is retried.

use crate::clock::{Clock, SystemClock};
use crate::engine::filter_sort;
use crate::model::criteria::{FilterCriteria, SortCriteria};
use crate::model::location::{Location, LocationDraft, LocationId};
use crate::stats::rating::{self, RatingBands, RatingStats};
use crate::stats::recency::{self, RecencyPolicy, RecencyStats};
use crate::store::location_store::{LocationStore, StoreResult};
use log::{debug, info, warn};
use serde::Serialize;
use std::time::Instant;

/// Both aggregate views computed from one store snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocationStats {
    pub rating: RatingStats,
    pub recency: RecencyStats,
}

pub struct LocationService<S: LocationStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    filter: FilterCriteria,
    sort: Option<SortCriteria>,
    rating_bands: RatingBands,
    recency: RecencyPolicy,
}

impl<S: LocationStore> LocationService<S> {
    /// Creates a facade over `store` using the wall clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: LocationStore, C: Clock> LocationService<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            filter: FilterCriteria::default(),
            sort: None,
            rating_bands: RatingBands::default(),
            recency: RecencyPolicy::default(),
        }
    }

    /// Seeds the session filter, typically from bootstrap parameters.
    pub fn with_filter(mut self, filter: FilterCriteria) -> Self {
        self.filter = filter.normalized();
        self
    }

    pub fn with_policies(mut self, rating_bands: RatingBands, recency: RecencyPolicy) -> Self {
        self.rating_bands = rating_bands;
        self.recency = recency;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn sort(&self) -> Option<&SortCriteria> {
        self.sort.as_ref()
    }

    /// Lists locations matching the session criteria.
    pub fn query(&self) -> StoreResult<Vec<Location>> {
        self.query_with(&self.filter, self.sort.as_ref())
    }

    /// Lists locations matching explicit criteria, ignoring session state.
    pub fn query_with(
        &self,
        filter: &FilterCriteria,
        sort: Option<&SortCriteria>,
    ) -> StoreResult<Vec<Location>> {
        let all = self.store.list()?;
        let total = all.len();
        let result = filter_sort::apply(all, filter, sort);
        debug!(
            "event=location_query module=service status=ok total={} matched={} min_rate={} has_txt={} sort={}",
            total,
            result.len(),
            filter.min_rate,
            !filter.txt.is_empty(),
            sort.map_or("none", |sort| sort.field.as_str())
        );
        Ok(result)
    }

    /// Creates when `draft.id` is absent, otherwise replaces the mutable
    /// fields of the existing record.
    ///
    /// # Errors
    /// - `Validation` before any write.
    /// - `NotFound` for an unknown `draft.id`.
    /// - `Db` when the write fails.
    pub fn save(&self, draft: LocationDraft) -> StoreResult<Location> {
        let started_at = Instant::now();
        let draft = match draft.validated() {
            Ok(draft) => draft,
            Err(err) => {
                warn!("event=location_save module=service status=error error_code=validation error={err}");
                return Err(err.into());
            }
        };

        let target = draft.id;
        let (mode, result) = match target {
            None => ("create", self.store.create(&draft)),
            Some(id) => ("update", self.store.update(id, &draft.into_patch())),
        };

        match &result {
            Ok(saved) => info!(
                "event=location_save module=service status=ok mode={} id={} duration_ms={}",
                mode,
                saved.id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=location_save module=service status=error mode={} duration_ms={} error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Deletes one location. Removing an absent id is `NotFound`.
    pub fn remove(&self, id: LocationId) -> StoreResult<()> {
        let result = self.store.remove(id);
        match &result {
            Ok(()) => info!("event=location_remove module=service status=ok id={id}"),
            Err(err) => warn!("event=location_remove module=service status=error id={id} error={err}"),
        }
        result
    }

    pub fn get_by_id(&self, id: LocationId) -> StoreResult<Location> {
        self.store.get_by_id(id)
    }

    /// Replaces the session filter and returns what was stored.
    pub fn set_filter(&mut self, filter: FilterCriteria) -> FilterCriteria {
        self.filter = filter.normalized();
        self.filter.clone()
    }

    /// Replaces the session sort; `None` restores insertion order.
    pub fn set_sort(&mut self, sort: Option<SortCriteria>) -> Option<SortCriteria> {
        self.sort = sort;
        self.sort
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    pub fn rating_stats(&self) -> StoreResult<RatingStats> {
        let all = self.store.list()?;
        Ok(rating::aggregate(&all, &self.rating_bands))
    }

    /// Samples the clock once for the whole pass.
    pub fn recency_stats(&self) -> StoreResult<RecencyStats> {
        let all = self.store.list()?;
        let now_ms = self.clock.now_ms();
        Ok(recency::aggregate(&all, now_ms, &self.recency))
    }

    /// Both views over a single store read, so their totals always agree.
    pub fn stats(&self) -> StoreResult<LocationStats> {
        let all = self.store.list()?;
        let now_ms = self.clock.now_ms();
        Ok(LocationStats {
            rating: rating::aggregate(&all, &self.rating_bands),
            recency: recency::aggregate(&all, now_ms, &self.recency),
        })
    }

    /// Creates `drafts` when the store holds no locations yet.
    ///
    /// Returns the number of created records; `0` when already populated.
    pub fn seed_if_empty(&self, drafts: &[LocationDraft]) -> StoreResult<usize> {
        if self.store.count()? > 0 {
            return Ok(0);
        }
        for draft in drafts {
            self.store.create(draft)?;
        }
        info!(
            "event=location_seed module=service status=ok created={}",
            drafts.len()
        );
        Ok(drafts.len())
    }
}
