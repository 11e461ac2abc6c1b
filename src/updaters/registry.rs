use std::sync::Arc;

use ahash::AHashMap;

use crate::{
    error::{Error, Result},
    graph::Graph,
    partition::Partition,
    updaters::{Shape, Strategy, Updater, Value, Values},
};

/// An ordered set of named updaters, validated once against a graph.
///
/// Updaters are evaluated in registration order, so an updater may read the
/// outputs of any updater registered before it.
#[derive(Clone)]
pub struct UpdaterRegistry {
    names: Arc<Vec<String>>,
    index: Arc<AHashMap<String, usize>>,
    updaters: Vec<Updater>,
}

impl UpdaterRegistry {
    /// Validate and register `updaters` in order.
    ///
    /// Fails with `InvalidUpdater` on duplicate names, series missing from the
    /// graph (or stored with the wrong type), and dependencies that are not
    /// registered earlier with the declared shape.
    pub fn new<S: Into<String>>(graph: &Graph, updaters: impl IntoIterator<Item = (S, Updater)>) -> Result<Self> {
        let mut names = Vec::new();
        let mut index = AHashMap::new();
        let mut registered = Vec::new();

        for (name, updater) in updaters {
            let name: String = name.into();
            let invalid = |reason: String| Error::InvalidUpdater { name: name.clone(), reason };

            if index.contains_key(&name) {
                return Err(invalid("name is registered twice".into()))
            }

            for (series, kind) in updater.series() {
                match graph.node_weights().series_type(series) {
                    None => return Err(invalid(format!("series '{series}' not found in node weights"))),
                    Some(found) if found != *kind =>
                        return Err(invalid(format!("series '{series}' is stored as {found:?}, expected {kind:?}"))),
                    Some(_) => {}
                }
            }

            for (dependency, shape) in updater.dependencies() {
                let Some(&i) = index.get(dependency) else {
                    return Err(invalid(format!("depends on '{dependency}', which is not registered before it")))
                };
                let found: &Updater = &registered[i];
                if found.shape() != *shape {
                    return Err(invalid(format!("depends on '{dependency}' as {shape:?}, but it yields {:?}", found.shape())))
                }
            }

            index.insert(name.clone(), names.len());
            names.push(name);
            registered.push(updater);
        }

        Ok(Self { names: Arc::new(names), index: Arc::new(index), updaters: registered })
    }

    /// Registered names in evaluation order.
    #[inline] pub fn names(&self) -> &[String] { &self.names }

    /// Check whether an updater is registered under `name`.
    #[inline] pub fn contains(&self, name: &str) -> bool { self.index.contains_key(name) }

    /// Declared shape of the updater registered under `name`.
    pub fn shape(&self, name: &str) -> Option<Shape> {
        self.index.get(name).map(|&i| self.updaters[i].shape())
    }

    /// Evaluate every updater against `partition`.
    ///
    /// When `prior` holds this registry's values for the parent of a
    /// flip-derived partition, incremental updaters patch the parent's value;
    /// everything else is recomputed in full.
    pub fn evaluate(&self, partition: &Partition, prior: Option<&Values>) -> Values {
        let parent = prior
            .filter(|values| Arc::ptr_eq(values.names_handle(), &self.names))
            .zip(partition.flip());

        let mut values = Values::with_capacity(self.names.clone(), self.index.clone());
        for (i, updater) in self.updaters.iter().enumerate() {
            let value = match (updater.strategy(), parent) {
                (Strategy::Incremental { update, .. }, Some((prior, flip))) => match prior.at(i) {
                    Some(previous) => update(partition, previous, flip),
                    None => self.full(i, partition, &values),
                },
                _ => self.full(i, partition, &values),
            };
            debug_assert_eq!(value.shape(), updater.shape(), "updater '{}' returned the wrong shape", self.names[i]);
            values.push(value);
        }
        values
    }

    /// Evaluate every updater from scratch.
    #[inline]
    pub fn evaluate_full(&self, partition: &Partition) -> Values {
        self.evaluate(partition, None)
    }

    fn full(&self, i: usize, partition: &Partition, values: &Values) -> Value {
        match self.updaters[i].strategy() {
            Strategy::Full(full) | Strategy::Incremental { full, .. } => full(partition, values),
        }
    }
}
