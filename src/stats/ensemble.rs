use std::collections::BTreeMap;

use serde::Serialize;

use crate::{chain::ChainStep, updaters::Value};

/// Min, max and mean of a numeric series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl Summary {
    /// Summarize `values`, or None if empty.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let (mut min, mut max, mut sum) = (f64::INFINITY, f64::NEG_INFINITY, 0.0);
        for value in values {
            count += 1;
            min = min.min(value);
            max = max.max(value);
            sum += value;
        }
        (count > 0).then(|| Self { min, max, mean: sum / count as f64 })
    }
}

/// Serializable digest of an ensemble: per-updater summaries and histograms of scalar series.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub steps: usize,
    pub accepted: usize,
    pub summaries: BTreeMap<String, Summary>,
    pub histograms: BTreeMap<String, BTreeMap<i64, usize>>,
    /// Per-district summaries of per-district series, districts sorted by value within each step.
    pub sorted_districts: BTreeMap<String, Vec<Summary>>,
}

/// Updater outputs collected across the steps of a chain.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Ensemble {
    steps: usize,
    accepted: usize,
    series: Vec<(String, Vec<Value>)>, // in registration order
}

impl Ensemble {
    pub fn new() -> Self { Self::default() }

    /// Append every updater output of `step`.
    pub fn record(&mut self, step: &ChainStep) {
        if self.series.is_empty() && self.steps == 0 {
            self.series = step.plan.values().iter()
                .map(|(name, _)| (name.to_string(), Vec::new()))
                .collect();
        }

        for (name, value) in step.plan.values().iter() {
            match self.series.iter_mut().find(|(series, _)| series == name) {
                Some((_, values)) => values.push(value.clone()),
                None => debug_assert!(false, "updater '{name}' was not present in the first step"),
            }
        }
        self.steps += 1;
        if step.accepted { self.accepted += 1 }
    }

    /// Number of recorded steps.
    #[inline] pub fn len(&self) -> usize { self.steps }

    #[inline] pub fn is_empty(&self) -> bool { self.steps == 0 }

    /// Number of recorded steps whose proposal was accepted.
    #[inline] pub fn accepted(&self) -> usize { self.accepted }

    /// Updater names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.series.iter().map(|(name, _)| name.as_str())
    }

    /// Recorded outputs of the updater called `name`, one per step.
    pub fn series(&self, name: &str) -> Option<&[Value]> {
        self.series.iter().find(|(series, _)| series == name).map(|(_, values)| values.as_slice())
    }

    /// Recorded outputs of a scalar updater.
    pub fn scalar_series(&self, name: &str) -> Option<Vec<i64>> {
        self.series(name)?.iter().map(Value::as_scalar).collect()
    }

    /// Min, max and mean of a scalar updater.
    pub fn summary(&self, name: &str) -> Option<Summary> {
        Summary::of(self.scalar_series(name)?.into_iter().map(|value| value as f64))
    }

    /// Value to count map of a scalar updater.
    pub fn histogram(&self, name: &str) -> Option<BTreeMap<i64, usize>> {
        let mut histogram = BTreeMap::new();
        for value in self.scalar_series(name)? {
            *histogram.entry(value).or_insert(0) += 1;
        }
        Some(histogram)
    }

    /// For a per-district updater, summarize the i-th smallest district value across steps.
    pub fn sorted_district_summary(&self, name: &str) -> Option<Vec<Summary>> {
        let sorted = self.series(name)?.iter()
            .map(|value| {
                let mut row = match value {
                    Value::Counts(counts) => counts.iter().map(|&c| c as f64).collect::<Vec<_>>(),
                    Value::Reals(reals) => reals.clone(),
                    Value::Scalar(_) => return None,
                };
                row.sort_by(f64::total_cmp);
                Some(row)
            })
            .collect::<Option<Vec<_>>>()?;

        let districts = sorted.first().map_or(0, Vec::len);
        (0..districts)
            .map(|i| Summary::of(sorted.iter().filter_map(|row| row.get(i).copied())))
            .collect()
    }

    /// Summaries and histograms of every scalar updater, and sorted-district
    /// summaries of every per-district updater.
    pub fn report(&self) -> Report {
        let mut report = Report {
            steps: self.steps,
            accepted: self.accepted,
            summaries: BTreeMap::new(),
            histograms: BTreeMap::new(),
            sorted_districts: BTreeMap::new(),
        };

        for name in self.names() {
            if let (Some(summary), Some(histogram)) = (self.summary(name), self.histogram(name)) {
                report.summaries.insert(name.to_string(), summary);
                report.histograms.insert(name.to_string(), histogram);
            } else if let Some(districts) = self.sorted_district_summary(name) {
                report.sorted_districts.insert(name.to_string(), districts);
            }
        }
        report
    }
}
