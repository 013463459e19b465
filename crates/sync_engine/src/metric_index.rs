//! Carry-forward metric index.
//!
//! One timestamp-sorted series per metric kind. A lookup at `t` returns the
//! latest sample with `timestamp <= t`; values hold constant between
//! observations and are never interpolated.

use contracts::{LinkMetrics, MetricKind, MetricSample};

#[derive(Debug, Clone, Copy)]
struct TimedValue {
    timestamp_ms: i64,
    value: f64,
}

/// Read-only per-kind sample index
#[derive(Debug, Clone, Default)]
pub struct MetricIndex {
    series: [Vec<TimedValue>; 3],
}

impl MetricIndex {
    /// Build from samples in source order.
    ///
    /// Sorting is stable, so samples sharing a timestamp keep input order and
    /// the last one wins on lookup.
    pub fn build<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = MetricSample>,
    {
        let mut index = Self::default();
        for sample in samples {
            index.series[sample.kind.index()].push(TimedValue {
                timestamp_ms: sample.timestamp_ms,
                value: sample.value,
            });
        }
        for series in &mut index.series {
            series.sort_by_key(|entry| entry.timestamp_ms);
        }

        tracing::debug!(
            signal_strength = index.len(MetricKind::SignalStrength),
            round_trip_time = index.len(MetricKind::RoundTripTime),
            sync_quality = index.len(MetricKind::SyncQuality),
            "metric index built"
        );
        index
    }

    /// Carried-forward value of `kind` at `timestamp_ms`
    pub fn lookup(&self, timestamp_ms: i64, kind: MetricKind) -> Option<f64> {
        self.lookup_sample(timestamp_ms, kind).map(|sample| sample.value)
    }

    /// Sample of `kind` with the maximum timestamp `<= timestamp_ms`
    pub fn lookup_sample(&self, timestamp_ms: i64, kind: MetricKind) -> Option<MetricSample> {
        let series = self.series(kind);
        let end = upper_bound(series, timestamp_ms);
        sample_before(series, end, kind)
    }

    /// All kinds at once, by binary search
    pub fn link_metrics(&self, timestamp_ms: i64) -> LinkMetrics {
        let mut metrics = LinkMetrics::default();
        for kind in MetricKind::ALL {
            metrics.set(kind, self.lookup(timestamp_ms, kind));
        }
        metrics
    }

    /// Forward cursor for monotonically increasing queries
    pub fn cursor(&self) -> MetricCursor<'_> {
        MetricCursor {
            index: self,
            positions: [0; 3],
        }
    }

    /// Number of samples of `kind`
    pub fn len(&self, kind: MetricKind) -> usize {
        self.series(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(Vec::is_empty)
    }

    fn series(&self, kind: MetricKind) -> &[TimedValue] {
        &self.series[kind.index()]
    }
}

/// Cursor over a [`MetricIndex`], one position per metric kind.
///
/// Invariant: for each kind, every entry before its position has
/// `timestamp <= ` the last query of that kind. Increasing queries only move
/// positions forward; a query that goes backwards is answered by binary
/// search and repositions the cursor.
#[derive(Debug, Clone)]
pub struct MetricCursor<'a> {
    index: &'a MetricIndex,
    positions: [usize; 3],
}

impl MetricCursor<'_> {
    pub fn lookup(&mut self, timestamp_ms: i64, kind: MetricKind) -> Option<f64> {
        self.lookup_sample(timestamp_ms, kind).map(|sample| sample.value)
    }

    pub fn lookup_sample(&mut self, timestamp_ms: i64, kind: MetricKind) -> Option<MetricSample> {
        let series = self.index.series(kind);
        let position = &mut self.positions[kind.index()];

        let moved_back = *position > 0 && series[*position - 1].timestamp_ms > timestamp_ms;
        if moved_back {
            *position = upper_bound(series, timestamp_ms);
        } else {
            while *position < series.len() && series[*position].timestamp_ms <= timestamp_ms {
                *position += 1;
            }
        }

        sample_before(series, *position, kind)
    }

    /// All kinds carried forward to `timestamp_ms`
    pub fn link_metrics(&mut self, timestamp_ms: i64) -> LinkMetrics {
        let mut metrics = LinkMetrics::default();
        for kind in MetricKind::ALL {
            metrics.set(kind, self.lookup(timestamp_ms, kind));
        }
        metrics
    }
}

/// Count of entries with `timestamp <= timestamp_ms`
fn upper_bound(series: &[TimedValue], timestamp_ms: i64) -> usize {
    series.partition_point(|entry| entry.timestamp_ms <= timestamp_ms)
}

fn sample_before(series: &[TimedValue], end: usize, kind: MetricKind) -> Option<MetricSample> {
    let entry = series.get(end.checked_sub(1)?)?;
    Some(MetricSample::new(entry.timestamp_ms, kind, entry.value))
}
