use std::sync::Arc;

use crate::{
    graph::WeightType,
    partition::{Flip, Partition},
    updaters::{Shape, Value, Values},
};

/// Recompute an aggregate from scratch, given the outputs of earlier updaters.
pub type FullFn = Arc<dyn Fn(&Partition, &Values) -> Value + Send + Sync>;

/// Adjust the parent's aggregate for the nodes moved by `flip`.
pub type IncrementalFn = Arc<dyn Fn(&Partition, &Value, &Flip) -> Value + Send + Sync>;

/// How an updater derives its value for a flip-derived partition.
#[derive(Clone)]
pub enum Strategy {
    /// Always recompute.
    Full(FullFn),
    /// Recompute for explicit partitions, patch from the parent value otherwise.
    /// `update` must agree exactly with `full`.
    Incremental { full: FullFn, update: IncrementalFn },
}

/// A named-aggregate derivation, registered in an `UpdaterRegistry`.
#[derive(Clone)]
pub struct Updater {
    shape: Shape,
    strategy: Strategy,
    series: Vec<(String, WeightType)>,
    depends_on: Vec<(String, Shape)>,
}

impl Updater {
    /// An updater that is always recomputed.
    pub fn full(shape: Shape, full: impl Fn(&Partition, &Values) -> Value + Send + Sync + 'static) -> Self {
        Self { shape, strategy: Strategy::Full(Arc::new(full)), series: vec![], depends_on: vec![] }
    }

    /// An updater with an incremental update path.
    pub fn incremental(
        shape: Shape,
        full: impl Fn(&Partition, &Values) -> Value + Send + Sync + 'static,
        update: impl Fn(&Partition, &Value, &Flip) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            shape,
            strategy: Strategy::Incremental { full: Arc::new(full), update: Arc::new(update) },
            series: vec![],
            depends_on: vec![],
        }
    }

    /// Declare a node weight series this updater reads.
    pub fn requires_series(mut self, series: &str, kind: WeightType) -> Self {
        self.series.push((series.to_string(), kind));
        self
    }

    /// Declare an updater (registered earlier) whose output this one reads.
    pub fn depends_on(mut self, name: &str, shape: Shape) -> Self {
        self.depends_on.push((name.to_string(), shape));
        self
    }

    #[inline] pub fn shape(&self) -> Shape { self.shape }

    #[inline] pub fn strategy(&self) -> &Strategy { &self.strategy }

    #[inline] pub(crate) fn series(&self) -> &[(String, WeightType)] { &self.series }

    #[inline] pub(crate) fn dependencies(&self) -> &[(String, Shape)] { &self.depends_on }

    /// Sum of an integer node series per district, updated incrementally on flips.
    pub fn tally(series: &str) -> Self {
        let full_series = series.to_string();
        let update_series = series.to_string();
        Self::incremental(
            Shape::Counts,
            move |partition, _| tally_full(partition, &full_series),
            move |partition, prior, flip| tally_update(partition, prior, flip, &update_series),
        )
        .requires_series(series, WeightType::I64)
    }

    /// Sum of a real node series per district, recomputed on every partition.
    pub fn real_tally(series: &str) -> Self {
        let series_name = series.to_string();
        Self::full(Shape::Reals, move |partition, _| {
            let weights = partition.graph().node_weights();
            Value::Reals((0..partition.num_districts())
                .map(|district| {
                    partition.nodes_in(district).iter()
                        .filter_map(|&u| weights.get_as_f64(&series_name, u))
                        .sum()
                })
                .collect())
        })
        .requires_series(series, WeightType::F64)
    }

    /// Number of cut edges.
    pub fn cut_edge_count() -> Self {
        Self::full(Shape::Scalar, |partition, _| Value::Scalar(partition.num_cut_edges() as i64))
    }
}

/// Exact per-district sum of an integer series.
fn tally_full(partition: &Partition, series: &str) -> Value {
    let num_districts = partition.num_districts();
    let Some(column) = partition.graph().node_weights().column_i64(series) else {
        debug_assert!(false, "series '{series}' missing from node weights");
        return Value::Counts(vec![0; num_districts as usize])
    };

    Value::Counts((0..num_districts)
        .map(|district| partition.nodes_in(district).iter().map(|&u| column[u]).sum())
        .collect())
}

/// Patch a per-district sum by subtracting moved nodes from their old district
/// and adding them to the new one.
fn tally_update(partition: &Partition, prior: &Value, flip: &Flip, series: &str) -> Value {
    let (Some(counts), Some(column)) = (prior.as_counts(), partition.graph().node_weights().column_i64(series)) else {
        return tally_full(partition, series)
    };

    let mut counts = counts.to_vec();
    for m in flip.moves() {
        counts[m.from as usize] -= column[m.node];
        counts[m.to as usize] += column[m.node];
    }
    Value::Counts(counts)
}
