use std::{fmt, sync::Arc};

use ahash::AHashMap;
use serde::{Serialize, Serializer, ser::SerializeMap};

/// Declared result shape of an updater.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// One exact integer per district (population, sub-population or vote tallies).
    Counts,
    /// One real number per district.
    Reals,
    /// A single integer for the whole plan (cut-edge count, districts won, ...).
    Scalar,
}

/// The output of one updater for one partition.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Counts(Vec<i64>),
    Reals(Vec<f64>),
    Scalar(i64),
}

impl Value {
    /// The shape this value has.
    pub fn shape(&self) -> Shape {
        match self {
            Value::Counts(_) => Shape::Counts,
            Value::Reals(_) => Shape::Reals,
            Value::Scalar(_) => Shape::Scalar,
        }
    }

    #[inline]
    pub fn as_counts(&self) -> Option<&[i64]> {
        match self { Value::Counts(values) => Some(values), _ => None }
    }

    #[inline]
    pub fn as_reals(&self) -> Option<&[f64]> {
        match self { Value::Reals(values) => Some(values), _ => None }
    }

    #[inline]
    pub fn as_scalar(&self) -> Option<i64> {
        match self { Value::Scalar(value) => Some(*value), _ => None }
    }
}

/// Updater outputs for one partition, addressable by updater name.
/// Built once by the registry and never mutated afterwards.
#[derive(Clone)]
pub struct Values {
    names: Arc<Vec<String>>,
    index: Arc<AHashMap<String, usize>>,
    values: Vec<Value>,
}

impl Values {
    pub(crate) fn with_capacity(names: Arc<Vec<String>>, index: Arc<AHashMap<String, usize>>) -> Self {
        let values = Vec::with_capacity(names.len());
        Self { names, index, values }
    }

    pub(crate) fn push(&mut self, value: Value) { self.values.push(value) }

    #[inline] pub(crate) fn names_handle(&self) -> &Arc<Vec<String>> { &self.names }

    /// Output of the updater called `name`, if it is registered and already evaluated.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.index.get(name).and_then(|&i| self.values.get(i))
    }

    /// Output at registration position `i`.
    #[inline] pub(crate) fn at(&self, i: usize) -> Option<&Value> { self.values.get(i) }

    /// Per-district counts of the updater called `name`.
    pub fn counts(&self, name: &str) -> Option<&[i64]> { self.get(name)?.as_counts() }

    /// Per-district reals of the updater called `name`.
    pub fn reals(&self, name: &str) -> Option<&[f64]> { self.get(name)?.as_reals() }

    /// Scalar output of the updater called `name`.
    pub fn scalar(&self, name: &str) -> Option<i64> { self.get(name)?.as_scalar() }

    /// Iterator over `(name, value)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Number of evaluated updaters.
    #[inline] pub fn len(&self) -> usize { self.values.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.values.is_empty() }
}

impl Serialize for Values {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl PartialEq for Values {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names && self.values == other.values
    }
}

impl fmt::Debug for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
